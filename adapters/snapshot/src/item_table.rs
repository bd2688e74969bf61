//! The `"M3CF"` power-up catalog format: a flat, versioned, length-
//! prefixed item list used to ship power-up definitions alongside a
//! level pack, independent of the richer full-session format in
//! [`crate::session`].

use std::convert::TryFrom;

use match3_core::Match3Error;

const MAGIC: &[u8; 4] = b"M3CF";
const VERSION: u32 = 1;

/// One catalog entry: a purchasable power-up's id, display name, cost,
/// and strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    /// Catalog-unique id.
    pub id: i32,
    /// Display name, UTF-8.
    pub name: String,
    /// Cost in whatever currency the host assigns.
    pub cost: i32,
    /// Effect strength; meaning is host-defined.
    pub power: i32,
}

/// A decoded or pending-encode item catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemTable {
    items: Vec<ItemEntry>,
}

impl ItemTable {
    /// Builds a table from entries, applying the duplicate-id overwrite
    /// rule up front.
    pub fn new(entries: Vec<ItemEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.upsert(entry);
        }
        table
    }

    /// The resolved entries, in first-seen-id order.
    pub fn items(&self) -> &[ItemEntry] {
        &self.items
    }

    fn upsert(&mut self, entry: ItemEntry) {
        match self.items.iter_mut().find(|existing| existing.id == entry.id) {
            Some(slot) => *slot = entry,
            None => self.items.push(entry),
        }
    }

    /// Encodes the table: `"M3CF"` magic, u32 version, u32 item count,
    /// then each item as `{ i32 id; length-prefixed UTF-8 name; i32
    /// cost; i32 power }`.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        buf.extend_from_slice(&(self.items.len() as u32).to_le_bytes());
        for item in &self.items {
            buf.extend_from_slice(&item.id.to_le_bytes());
            let name = item.name.as_bytes();
            buf.extend_from_slice(&(name.len() as u32).to_le_bytes());
            buf.extend_from_slice(name);
            buf.extend_from_slice(&item.cost.to_le_bytes());
            buf.extend_from_slice(&item.power.to_le_bytes());
        }
        buf
    }

    /// Decodes a table, applying the duplicate-id overwrite rule as
    /// later entries are read. Fails on a wrong magic, an unsupported
    /// version, or a buffer that runs out mid-item.
    pub fn decode(bytes: &[u8]) -> Result<Self, Match3Error> {
        let mut reader = Reader::new(bytes);

        let magic = reader.take(4)?;
        if magic != MAGIC.as_slice() {
            return Err(Match3Error::InvalidData("item table: bad magic".to_string()));
        }

        let version = reader.read_u32()?;
        if version != VERSION {
            return Err(Match3Error::InvalidData(format!(
                "item table: unsupported version {version}"
            )));
        }

        let count = reader.read_u32()?;
        let mut table = Self::default();
        for _ in 0..count {
            let id = reader.read_i32()?;
            let name_len = reader.read_u32()? as usize;
            let name_bytes = reader.take(name_len)?;
            let name = String::from_utf8(name_bytes.to_vec())
                .map_err(|e| Match3Error::InvalidData(format!("item table: bad name: {e}")))?;
            let cost = reader.read_i32()?;
            let power = reader.read_i32()?;
            table.upsert(ItemEntry { id, name, cost, power });
        }

        Ok(table)
    }
}

/// A cursor over a byte slice that reports truncation as `InvalidData`
/// instead of panicking.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Match3Error> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(Match3Error::InvalidData("item table: truncated".to_string())),
        }
    }

    fn read_u32(&mut self) -> Result<u32, Match3Error> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(<[u8; 4]>::try_from(bytes).expect("length checked above")))
    }

    fn read_i32(&mut self) -> Result<i32, Match3Error> {
        self.read_u32().map(|v| v as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ItemTable {
        ItemTable::new(vec![
            ItemEntry { id: 1, name: "Hammer".to_string(), cost: 100, power: 1 },
            ItemEntry { id: 2, name: "Shuffle".to_string(), cost: 50, power: 0 },
        ])
    }

    #[test]
    fn round_trips_through_encode_decode() {
        let table = sample();
        let decoded = ItemTable::decode(&table.encode()).expect("valid table");
        assert_eq!(decoded, table);
    }

    #[test]
    fn later_duplicate_id_overwrites_earlier() {
        let table = ItemTable::new(vec![
            ItemEntry { id: 1, name: "Hammer".to_string(), cost: 100, power: 1 },
            ItemEntry { id: 1, name: "Hammer Mk2".to_string(), cost: 150, power: 2 },
        ]);
        assert_eq!(table.items().len(), 1);
        assert_eq!(table.items()[0].name, "Hammer Mk2");
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = sample().encode();
        bytes[0] = b'X';
        assert!(matches!(ItemTable::decode(&bytes), Err(Match3Error::InvalidData(_))));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut bytes = sample().encode();
        bytes[4..8].copy_from_slice(&99u32.to_le_bytes());
        assert!(matches!(ItemTable::decode(&bytes), Err(Match3Error::InvalidData(_))));
    }

    #[test]
    fn rejects_truncated_buffer() {
        let bytes = sample().encode();
        let truncated = &bytes[..bytes.len() - 2];
        assert!(matches!(ItemTable::decode(truncated), Err(Match3Error::InvalidData(_))));
    }
}
