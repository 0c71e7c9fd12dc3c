//! Symbol table for the target ROM.
//!
//! Parsed once at startup from the linker's `.sym` listing. Lines look like
//!
//! ```text
//! 0300500C g 00000004 gSaveBlock1Ptr
//! 08008E2C l 000000A4 Task_StartMenuHandleInput
//! ```
//!
//! where the kind column and the size column are both optional. Homonyms are
//! legal in the listing (several static functions share a name across
//! compilation units); resolving one *without* an explicit disambiguator is
//! a hard failure, so a schema entry can never silently bind to the wrong
//! copy.

use std::collections::HashMap;

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub addr: u32,
    pub size: u32,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Vec<SymbolEntry>>,
}

fn parse_hex(token: &str) -> Option<u32> {
    let token = token.strip_prefix("0x").unwrap_or(token);
    u32::from_str_radix(token, 16).ok()
}

impl SymbolTable {
    /// Parse a listing. Blank lines and `;` / `//` comments are skipped.
    pub fn parse(listing: &str) -> Result<Self, SchemaError> {
        let mut entries: HashMap<String, Vec<SymbolEntry>> = HashMap::new();

        for (idx, raw_line) in listing.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with("//") {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let malformed = || SchemaError::MalformedListing {
                line_no: idx + 1,
                line: raw_line.to_owned(),
            };

            let (&first, rest) = tokens.split_first().ok_or_else(malformed)?;
            let addr = parse_hex(first).ok_or_else(malformed)?;
            let (&name, middle) = rest.split_last().ok_or_else(malformed)?;
            if name.is_empty() || parse_hex(name).is_some() && middle.is_empty() {
                return Err(malformed());
            }

            // Any hex token between address and name is the size; single
            // letters are the symbol kind and are ignored.
            let size = middle
                .iter()
                .filter(|t| t.len() > 1)
                .find_map(|t| parse_hex(t))
                .unwrap_or(0);

            entries
                .entry(name.to_owned())
                .or_default()
                .push(SymbolEntry { addr, size });
        }

        Ok(Self { entries })
    }

    /// Resolve a symbol that must be unique.
    pub fn addr(&self, name: &str) -> Result<u32, SchemaError> {
        match self.entries.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(SchemaError::MissingSymbol(name.to_owned())),
            Some([only]) => Ok(only.addr),
            Some(many) => Err(SchemaError::AmbiguousSymbol {
                name: name.to_owned(),
                candidates: many.len(),
            }),
        }
    }

    /// All entries sharing `name`, in listing order. Empty if unknown.
    #[must_use]
    pub fn addrs(&self, name: &str) -> &[SymbolEntry] {
        self.entries.get(name).map_or(&[], Vec::as_slice)
    }

    /// Resolve a unique symbol together with its size.
    pub fn entry(&self, name: &str) -> Result<SymbolEntry, SchemaError> {
        match self.entries.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(SchemaError::MissingSymbol(name.to_owned())),
            Some([only]) => Ok(*only),
            Some(many) => Err(SchemaError::AmbiguousSymbol {
                name: name.to_owned(),
                candidates: many.len(),
            }),
        }
    }

    /// Resolve a possibly-homonymous symbol by picking the candidate closest
    /// to `anchor`. Still fails if the name is entirely unknown.
    pub fn addr_near(&self, name: &str, anchor: u32) -> Result<u32, SchemaError> {
        let candidates = self.addrs(name);
        candidates
            .iter()
            .min_by_key(|e| e.addr.abs_diff(anchor))
            .map(|e| e.addr)
            .ok_or_else(|| SchemaError::MissingSymbol(name.to_owned()))
    }

    /// Resolve `name`, falling back to `fallback` when `name` is absent.
    /// Ambiguity of the resolved name is still a hard failure.
    pub fn addr_or(&self, name: &str, fallback: &str) -> Result<u32, SchemaError> {
        match self.addr(name) {
            Err(SchemaError::MissingSymbol(_)) => self.addr(fallback),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::SchemaError;

    const LISTING: &str = "\
0300500C g 00000004 gSaveBlock1Ptr
03005010 g 00000004 gSaveBlock2Ptr
; comment line
08008E2C l 000000A4 Task_TopMenuHandleInput
0812F004 l 000000A4 Task_TopMenuHandleInput
02024284 gPlayerParty
";

    #[test]
    fn parses_with_and_without_kind_and_size() {
        let table = SymbolTable::parse(LISTING).unwrap();
        assert_eq!(table.addr("gSaveBlock1Ptr").unwrap(), 0x0300_500C);
        assert_eq!(table.addr("gPlayerParty").unwrap(), 0x0202_4284);
        assert_eq!(
            table.entry("gSaveBlock2Ptr").unwrap(),
            SymbolEntry { addr: 0x0300_5010, size: 4 }
        );
    }

    #[test]
    fn missing_symbol_is_a_hard_failure() {
        let table = SymbolTable::parse(LISTING).unwrap();
        assert_eq!(
            table.addr("gNoSuchSymbol").unwrap_err(),
            SchemaError::MissingSymbol("gNoSuchSymbol".to_owned())
        );
    }

    #[test]
    fn homonyms_refuse_plain_resolution() {
        let table = SymbolTable::parse(LISTING).unwrap();
        assert_eq!(
            table.addr("Task_TopMenuHandleInput").unwrap_err(),
            SchemaError::AmbiguousSymbol {
                name: "Task_TopMenuHandleInput".to_owned(),
                candidates: 2,
            }
        );
        // The near= heuristic picks the candidate closest to the anchor.
        assert_eq!(
            table.addr_near("Task_TopMenuHandleInput", 0x0800_0000).unwrap(),
            0x0800_8E2C
        );
        assert_eq!(
            table.addr_near("Task_TopMenuHandleInput", 0x0812_0000).unwrap(),
            0x0812_F004
        );
    }

    #[test]
    fn fallback_resolution() {
        let table = SymbolTable::parse(LISTING).unwrap();
        assert_eq!(
            table.addr_or("gSpeciesInfo", "gPlayerParty").unwrap(),
            0x0202_4284
        );
        assert_eq!(
            table.addr_or("gSaveBlock1Ptr", "gPlayerParty").unwrap(),
            0x0300_500C
        );
    }
}
