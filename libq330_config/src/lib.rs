//! # q330_config
//!
//! q330_config generates the supplemental configuration documents consumed by Q330 field
//! digitizers. Given the hardware profile of a station (seismometer model, gain and rate
//! flags, auxiliary channel presence, GPS power policy) it produces the stanza document
//! for the station's standard rate (SR) unit and, if present, its high rate (HR) unit.
//!
//! ## Installation
//!
//! Currently the only method of install is from source.
//!
//! To build and install the batch tool use `cargo install --path ./q330_config_cli` from
//! the top level q330_config repository. The binary will be installed to your cargo
//! install location (typically something like `~/.cargo/bin/`).
//!
//! ## Library use
//!
//! The generator is a pure function; it does no I/O and holds no state, so it is safe to
//! call from any number of threads.
//!
//! ```no_run
//! use libq330_config::generator::generate;
//! use libq330_config::inventory::Inventory;
//!
//! let inventory = Inventory::read_inventory_file("inventory.yaml".as_ref()).unwrap();
//! let record = &inventory.stations[0];
//! let sr_config = generate(&record.station, &record.das_parms[0], 0).unwrap();
//! print!("{sr_config}");
//! ```
//!
//! ## Configuration
//!
//! The batch tool reads a YAML configuration:
//!
//! ```yml
//! inventory_path: /path/to/inventory.yaml
//! output_path: /path/to/output/
//! history_path: /path/to/history/
//! make_chans: false
//! channel_table_path: null
//! n_threads: 1
//! ```
//!
//! - `inventory_path`: the station records exported from the equipment database
//! - `output_path`: directory that receives one `supplemental.config.{unit}` per unit
//! - `history_path` (Optional): directory holding every distinct configuration ever
//! generated for each unit. A new version is stored only when the generated text differs
//! from the latest stored one. If `null`, no history is kept.
//! - `make_chans`: also write a `channels.{unit}.csv` channel table for each unit
//! - `channel_table_path` (Optional): directory for channel tables; defaults to `output_path`
//! - `n_threads`: number of worker threads the stations are divided amongst
//!
//! ### Inventory Format
//!
//! ```yml
//! stations:
//!   - station:
//!       q330_stations: [ANMO, ANMOHR]
//!       q330_inet_address: [136.177.1.10, 136.177.1.11]
//!       q330_nat_address: [192.168.1.10, 192.168.1.11]
//!       tcp_station_code: ANMO
//!     das_parms:
//!       - gps_config: "On"
//!         seed_network: IU
//!         seismometer_model: STS-2
//!         cal_enable: SEISMOMETER
//!         cont40: 1
//!         cont20: 0
//!         has_auxad: false
//!         aux_ch2_is_battery: false
//!         has_low_gain: false
//!         has_high_gain: true
//! ```
//!
//! There must be one `das_parms` entry per unit in `q330_stations`, in the same order.
//! Missing `das_parms` fields take their defaults.
//!
//! ## Output
//!
//! The supplemental configuration is a list of `key=value` lines ending with the
//! `# <End-of-Config>` sentinel. Channel declarations have the form
//!
//! ```text
//! DP{data port}_LCQ={location},{channel},{source},{rate}[,{trailer}]
//! ```
//!
//! and are repeated for data ports 1 and 4.
pub mod channel_table;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod history;
pub mod inventory;
pub mod process;
pub mod profile;
pub mod sensor;
pub mod worker_status;
