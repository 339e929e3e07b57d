// The channel table is the flat list of channels a unit produces, kept next to the
// supplemental configuration so that downstream channel inventories can be synchronized
// without parsing the stanza format themselves.
//
// Rows are [data port, location, channel, source, rate] with no whitespace. Empty
// locations and rates are kept as empty fields.
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::error::ChannelTableError;

const ENTRIES_PER_LINE: usize = 5;
const MIN_LCQ_FIELDS: usize = 4;
const HEADER: &str = "data port,location,channel,source,rate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub data_port: u8,
    pub location: String,
    pub channel: String,
    pub source: String,
    pub rate: String,
}

impl ChannelEntry {
    fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.data_port, self.location, self.channel, self.source, self.rate
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTable {
    entries: Vec<ChannelEntry>,
}

impl ChannelTable {
    /// Extract every LCQ declaration from a generated supplemental configuration
    pub fn from_config(config: &str) -> Result<Self, ChannelTableError> {
        let mut table = ChannelTable::default();
        for line in config.lines() {
            let Some((key, value)) = line.split_once("_LCQ=") else {
                continue;
            };
            let port = key
                .strip_prefix("DP")
                .ok_or_else(|| ChannelTableError::BadLcqLine(line.to_string()))?;
            let fields: Vec<&str> = value.split(',').collect();
            if fields.len() < MIN_LCQ_FIELDS {
                return Err(ChannelTableError::BadLcqLine(line.to_string()));
            }
            table.entries.push(ChannelEntry {
                data_port: port.parse()?,
                location: fields[0].to_string(),
                channel: fields[1].to_string(),
                source: fields[2].to_string(),
                rate: fields[3].to_string(),
            });
        }
        Ok(table)
    }

    /// Read a table previously written with [`ChannelTable::write`]
    pub fn read(path: &Path) -> Result<Self, ChannelTableError> {
        let mut contents = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;

        let mut table = ChannelTable::default();
        let mut lines = contents.lines();
        lines.next(); // Skip the header
        for line in lines {
            let entries: Vec<&str> = line.split(',').collect();
            if entries.len() != ENTRIES_PER_LINE {
                return Err(ChannelTableError::BadFileFormat);
            }
            table.entries.push(ChannelEntry {
                data_port: entries[0].parse()?,
                location: entries[1].to_string(),
                channel: entries[2].to_string(),
                source: entries[3].to_string(),
                rate: entries[4].to_string(),
            });
        }
        Ok(table)
    }

    pub fn to_csv(&self) -> String {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for entry in self.entries.iter() {
            csv.push_str(&entry.to_csv_row());
            csv.push('\n');
        }
        csv
    }

    pub fn write(&self, path: &Path) -> Result<(), ChannelTableError> {
        let mut file = File::create(path)?;
        file.write_all(self.to_csv().as_bytes())?;
        Ok(())
    }

    /// Bring the table at `path` in line with this one.
    ///
    /// Returns true if the file was (re)written, false if it already matched.
    pub fn sync(&self, path: &Path) -> Result<bool, ChannelTableError> {
        if path.exists() && std::fs::read_to_string(path)? == self.to_csv() {
            return Ok(false);
        }
        self.write(path)?;
        Ok(true)
    }

    pub fn entries(&self) -> &[ChannelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "# Unit: ANMO\n\
        DP1_Network=IU\n\
        DP1_MsgLog=91,LOG\n\
        DP1_LCQ=00,BHZ,4,40\n\
        DP1_LCQ=,BC,4,20,BC1\n\
        DP4_LCQ=00,VHZ,4,\n\
        # <End-of-Config>\n";

    #[test]
    fn test_from_config() {
        let table = ChannelTable::from_config(CONFIG).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.entries()[1],
            ChannelEntry {
                data_port: 1,
                location: String::new(),
                channel: String::from("BC"),
                source: String::from("4"),
                rate: String::from("20"),
            }
        );
        assert_eq!(table.entries()[2].data_port, 4);
        assert!(table.entries()[2].rate.is_empty());
    }

    #[test]
    fn test_bad_lcq_line() {
        match ChannelTable::from_config("DP1_LCQ=00,BHZ\n") {
            Err(ChannelTableError::BadLcqLine(line)) => assert_eq!(line, "DP1_LCQ=00,BHZ"),
            _ => panic!(),
        }
        assert!(matches!(
            ChannelTable::from_config("DPX_LCQ=00,BHZ,4,40\n"),
            Err(ChannelTableError::ParsingError(_))
        ));
    }

    #[test]
    fn test_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.ANMO.csv");
        let table = ChannelTable::from_config(CONFIG).unwrap();
        assert!(table.to_csv().starts_with("data port,location,channel,source,rate\n"));
        assert!(table.to_csv().contains("\n4,00,VHZ,4,\n"));

        assert!(table.sync(&path).unwrap());
        assert!(!table.sync(&path).unwrap());
        assert_eq!(ChannelTable::read(&path).unwrap(), table);
    }

    #[test]
    fn test_bad_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "header\n1,00,BHZ\n").unwrap();
        assert!(matches!(
            ChannelTable::read(&path),
            Err(ChannelTableError::BadFileFormat)
        ));
    }
}
