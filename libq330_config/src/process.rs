use std::ops::AddAssign;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use super::channel_table::ChannelTable;
use super::config::Config;
use super::error::ProcessorError;
use super::generator::generate_unit;
use super::history::{write_if_changed, ConfigStore, DirectoryStore};
use super::inventory::StationRecord;
use super::profile::UnitPort;
use super::worker_status::WorkerStatus;

/// Unit and station counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Units whose configuration was new or changed
    pub written: usize,
    /// Units whose configuration matched the latest stored version
    pub unchanged: usize,
    /// Stations that were skipped due to an error
    pub failed: usize,
}

impl AddAssign for BatchReport {
    fn add_assign(&mut self, rhs: Self) {
        self.written += rhs.written;
        self.unchanged += rhs.unchanged;
        self.failed += rhs.failed;
    }
}

/// A unit whose configuration and output locations are resolved, but not yet written
struct UnitOutput<'a> {
    tag: &'a str,
    text: String,
    config_path: PathBuf,
    table: Option<(PathBuf, ChannelTable)>,
}

/// Generate, write and archive the configuration of every unit at a station.
///
/// Every unit is generated, and its output path, channel table and history tag resolved,
/// before the first write. A bad record, tag or output directory on any unit therefore
/// leaves the station untouched. Without a history store every unit counts as written.
pub fn process_station(
    config: &Config,
    record: &StationRecord,
    mut store: Option<&mut dyn ConfigStore>,
) -> Result<BatchReport, ProcessorError> {
    let station = &record.station;
    station.validate()?;

    let mut outputs: Vec<UnitOutput> = Vec::with_capacity(station.unit_count());
    for index in 0..station.unit_count() {
        let tag = station.unit_tag(index)?;
        let Some(das_parms) = record.das_parms.get(index) else {
            return Err(ProcessorError::MissingDasParms(tag.to_string()));
        };
        let port = UnitPort::try_from(index)?;
        let text = generate_unit(station, das_parms, port)?;
        let config_path = config.get_config_file_name(tag)?;
        let table = if config.make_chans {
            Some((
                config.get_channel_table_file_name(tag)?,
                ChannelTable::from_config(&text)?,
            ))
        } else {
            None
        };
        if let Some(store) = store.as_deref() {
            store.check_tag(tag)?;
        }
        outputs.push(UnitOutput {
            tag,
            text,
            config_path,
            table,
        });
    }

    let mut report = BatchReport::default();
    for unit in outputs {
        std::fs::write(&unit.config_path, &unit.text)?;
        log::info!("Wrote {}", unit.config_path.to_string_lossy());

        let changed = match store.as_deref_mut() {
            Some(store) => write_if_changed(store, unit.tag, &unit.text)?,
            None => true,
        };
        if changed {
            report.written += 1;
        } else {
            report.unchanged += 1;
        }

        if let Some((table_path, table)) = unit.table {
            if table.sync(&table_path)? {
                log::info!(
                    "Synchronized {} channels for {} to {}",
                    table.len(),
                    unit.tag,
                    table_path.to_string_lossy()
                );
            }
        }
    }
    Ok(report)
}

fn open_store(config: &Config) -> Result<Option<Box<dyn ConfigStore>>, ProcessorError> {
    match &config.history_path {
        Some(path) => Ok(Some(Box::new(DirectoryStore::new(path)?))),
        None => Ok(None),
    }
}

/// Process a subset of stations.
///
/// A station that fails is logged and counted, and the batch moves on to the next one.
/// Only failures of the worker itself (history root, status channel) end the subset.
pub fn process_subset(
    config: Config,
    stations: Vec<StationRecord>,
    tx: Sender<WorkerStatus>,
    worker_id: usize,
) -> Result<BatchReport, ProcessorError> {
    let mut store = open_store(&config)?;
    let mut report = BatchReport::default();
    let n_stations = stations.len();
    for (idx, record) in stations.iter().enumerate() {
        let name = record.station.tcp_station_code.as_str();
        log::info!("Processing station {name}...");
        match process_station(
            &config,
            record,
            store.as_deref_mut().map(|s| s as &mut dyn ConfigStore),
        ) {
            Ok(station_report) => {
                report += station_report;
                log::info!("Finished processing station {name}.");
            }
            Err(e) => {
                report.failed += 1;
                log::error!("Skipping station {name}: {e}");
            }
        }
        tx.send(WorkerStatus::new(
            (idx + 1) as f32 / n_stations as f32,
            name,
            worker_id,
        ))?;
    }
    Ok(report)
}

/// Divide the station indices of an inventory into a set of subsets (per thread/worker)
pub fn create_subsets(n_stations: usize, n_threads: usize) -> Vec<Vec<usize>> {
    let mut subsets: Vec<Vec<usize>> = vec![Vec::new(); n_threads.max(1)];
    let n_subsets = subsets.len();

    for station in 0..n_stations {
        subsets[station % n_subsets].push(station)
    }

    subsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;
    use crate::error::ProfileError;
    use crate::profile::{ChannelProfile, GpsConfig, StationProfile};
    use std::net::Ipv4Addr;
    use std::path::Path;
    use std::sync::mpsc;

    fn das_parms() -> ChannelProfile {
        ChannelProfile {
            gps_config: GpsConfig::On,
            seed_network: String::from("IU"),
            seismometer_model: String::from("STS-2"),
            cal_enable: String::from("SEISMOMETER"),
            cont40: 1,
            has_high_gain: true,
            ..Default::default()
        }
    }

    fn station(code: &str, tags: &[&str]) -> StationProfile {
        let n = tags.len() as u8;
        StationProfile {
            q330_stations: tags.iter().map(|t| t.to_string()).collect(),
            q330_inet_address: (0..n).map(|i| Ipv4Addr::new(136, 177, 1, 10 + i)).collect(),
            q330_nat_address: (0..n).map(|i| Ipv4Addr::new(192, 168, 1, 10 + i)).collect(),
            tcp_station_code: code.to_string(),
        }
    }

    fn inventory() -> Vec<StationRecord> {
        let mut bad = station("BAD", &["BAD"]);
        bad.q330_nat_address.clear();
        vec![
            StationRecord {
                station: station("ANMO", &["ANMO", "ANMOHR"]),
                das_parms: vec![das_parms(), das_parms()],
            },
            StationRecord {
                station: station("COLA", &["COLA"]),
                das_parms: vec![],
            },
            StationRecord {
                station: bad,
                das_parms: vec![das_parms()],
            },
        ]
    }

    fn config(dir: &Path) -> Config {
        Config {
            inventory_path: dir.join("inventory.yaml"),
            output_path: dir.to_path_buf(),
            history_path: Some(dir.join("history")),
            make_chans: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_das_parms() {
        let dir = tempfile::tempdir().unwrap();
        let records = inventory();
        match process_station(&config(dir.path()), &records[1], None) {
            Err(ProcessorError::MissingDasParms(tag)) => assert_eq!(tag, "COLA"),
            _ => panic!(),
        }
        assert!(!dir.path().join("supplemental.config.COLA").exists());
    }

    #[test]
    fn test_too_many_units() {
        let dir = tempfile::tempdir().unwrap();
        let record = StationRecord {
            station: station("TRIO", &["TRIO", "TRIOHR", "TRIOX"]),
            das_parms: vec![das_parms(), das_parms(), das_parms()],
        };
        assert!(matches!(
            process_station(&config(dir.path()), &record, None),
            Err(ProcessorError::GeneratorError(_))
        ));
        assert!(!dir.path().join("supplemental.config.TRIO").exists());
    }

    #[test]
    fn test_bad_second_tag_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let record = StationRecord {
            station: station("ANMO", &["ANMO", "../ESCAPE"]),
            das_parms: vec![das_parms(), das_parms()],
        };
        let mut store = MemoryStore::new();
        match process_station(&config(dir.path()), &record, Some(&mut store)) {
            Err(ProcessorError::ProfileError(ProfileError::BadUnitTag { tag, .. })) => {
                assert_eq!(tag, "../ESCAPE")
            }
            _ => panic!(),
        }
        assert!(!dir.path().join("supplemental.config.ANMO").exists());
        assert!(!dir.path().join("channels.ANMO.csv").exists());
        assert!(store.versions("ANMO").is_empty());
    }

    #[test]
    fn test_missing_table_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let records = inventory();
        let mut config = config(dir.path());
        config.channel_table_path = Some(dir.path().join("tables"));
        let mut store = MemoryStore::new();
        assert!(matches!(
            process_station(&config, &records[0], Some(&mut store)),
            Err(ProcessorError::ConfigError(_))
        ));
        assert!(!dir.path().join("supplemental.config.ANMO").exists());
        assert!(store.versions("ANMO").is_empty());

        std::fs::create_dir(dir.path().join("tables")).unwrap();
        let report = process_station(&config, &records[0], Some(&mut store)).unwrap();
        assert_eq!(report.written, 2);
        assert!(dir.path().join("tables").join("channels.ANMOHR.csv").exists());
    }

    #[test]
    fn test_process_station_with_memory_store() {
        let dir = tempfile::tempdir().unwrap();
        let records = inventory();
        let config = config(dir.path());
        let mut store = MemoryStore::new();

        let report = process_station(&config, &records[0], Some(&mut store)).unwrap();
        assert_eq!(report.written, 2);
        let report = process_station(&config, &records[0], Some(&mut store)).unwrap();
        assert_eq!(report.unchanged, 2);
        assert_eq!(store.versions("ANMO").len(), 1);
        assert_eq!(store.versions("ANMOHR").len(), 1);

        let on_disk = std::fs::read_to_string(dir.path().join("supplemental.config.ANMOHR")).unwrap();
        assert_eq!(store.versions("ANMOHR")[0], on_disk);
    }

    #[test]
    fn test_process_subset_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel::<WorkerStatus>();

        let report = process_subset(config(dir.path()), inventory(), tx.clone(), 0).unwrap();
        assert_eq!(
            report,
            BatchReport {
                written: 2,
                unchanged: 0,
                failed: 2
            }
        );
        let statuses: Vec<WorkerStatus> = rx.try_iter().collect();
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[2].station, "BAD");
        assert_eq!(statuses[2].progress, 1.0);

        assert!(dir.path().join("supplemental.config.ANMO").exists());
        let table = ChannelTable::read(&dir.path().join("channels.ANMOHR.csv")).unwrap();
        assert!(table.entries().iter().any(|e| e.channel == "LDO"));

        // A second pass with unchanged inputs stores nothing new
        let report = process_subset(config(dir.path()), inventory(), tx, 0).unwrap();
        assert_eq!(report.written, 0);
        assert_eq!(report.unchanged, 2);
        let store = DirectoryStore::new(&dir.path().join("history")).unwrap();
        assert_eq!(store.version_paths("ANMO").unwrap().len(), 1);
    }

    #[test]
    fn test_create_subsets() {
        assert_eq!(
            create_subsets(5, 2),
            vec![vec![0, 2, 4], vec![1, 3]]
        );
        assert_eq!(create_subsets(2, 3), vec![vec![0], vec![1], vec![]]);
        assert_eq!(create_subsets(1, 0), vec![vec![0]]);
    }

    #[test]
    fn test_report_accumulates() {
        let mut report = BatchReport::default();
        report += BatchReport {
            written: 1,
            unchanged: 2,
            failed: 3,
        };
        report += BatchReport {
            written: 1,
            unchanged: 0,
            failed: 0,
        };
        assert_eq!(
            report,
            BatchReport {
                written: 2,
                unchanged: 2,
                failed: 3
            }
        );
    }
}
