//! Catalog data: the items to look up, where, and how to format them.
//!
//! The catalog arrives as JSON files in a handful of shapes (clans with
//! nested families, grouped advantage lists, technique trees, flat item
//! lists). Every shape flattens into [`CatalogEntry`]s, in a fixed order, with
//! the override table and the per item-type policies already applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::locate::{EntryRequest, FormattingPolicy};

/// Where an item is printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub book: String,
    /// Printed page number.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub reference: Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clan {
    pub name: String,
    pub reference: Reference,
    #[serde(default)]
    pub families: Vec<CatalogItem>,
}

/// A named group of items, e.g. `{"name": "Distinctions", "entries": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryList {
    pub name: String,
    pub entries: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueType {
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default)]
    pub name: String,
    pub techniques: Vec<CatalogItem>,
}

/// Replacement search data for an item whose catalog record does not match
/// the book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    /// Heading to search for instead of the catalog name.
    pub name: Option<String>,
    pub book: Option<String>,
    pub page: Option<usize>,
}

/// Overrides keyed by canonical item name.
pub type OverrideTable = BTreeMap<String, Override>;

/// Formatting policies keyed by item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyTable(pub BTreeMap<String, FormattingPolicy>);

const SCHOOL_IGNORED: [&str; 9] = [
    "starting techniques",
    "starting skills",
    "rings",
    "kata",
    "shūji",
    "ninjutsu",
    "ritual",
    "invocation",
    "kihō",
];

const FAMILY_IGNORED: [&str; 3] = ["ring increase", "skill increase", "glory"];

impl Default for PolicyTable {
    fn default() -> Self {
        let ignoring = |props: &[&str]| -> Vec<String> { props.iter().map(|p| p.to_string()).collect() };
        let mut table = BTreeMap::new();
        table.insert(
            "clan".to_string(),
            FormattingPolicy {
                beginning_properties: true,
                ..FormattingPolicy::default()
            },
        );
        table.insert(
            "family".to_string(),
            FormattingPolicy {
                ignored_properties: ignoring(&FAMILY_IGNORED),
                beginning_properties: true,
                ..FormattingPolicy::default()
            },
        );
        table.insert(
            "school".to_string(),
            FormattingPolicy {
                ignored_properties: ignoring(&SCHOOL_IGNORED),
                ..FormattingPolicy::default()
            },
        );
        for item_type in ["distinction", "passion", "adversity", "anxiety"] {
            table.insert(
                item_type.to_string(),
                FormattingPolicy {
                    cut_to_list: true,
                    ..FormattingPolicy::default()
                },
            );
        }
        PolicyTable(table)
    }
}

impl PolicyTable {
    /// Policy for `item_type`, or `fallback` when none is configured.
    pub fn get_or(&self, item_type: &str, fallback: FormattingPolicy) -> FormattingPolicy {
        self.0.get(item_type).cloned().unwrap_or(fallback)
    }

    pub fn get(&self, item_type: &str) -> FormattingPolicy {
        self.get_or(item_type, FormattingPolicy::default())
    }

    /// Layer `other` over this table; entries of `other` win.
    pub fn merge(&mut self, other: PolicyTable) {
        self.0.extend(other.0);
    }
}

/// Item type of an advantage group: `"Distinctions"` -> `"distinction"`,
/// `"Adversities"` -> `"adversity"`.
pub fn singular_item_type(group: &str) -> String {
    let lower = group.trim().to_lowercase();
    if let Some(stem) = lower.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = lower.strip_suffix('s') {
        stem.to_string()
    } else {
        lower
    }
}

/// A fully resolved lookup: what to search for and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub search_name: String,
    pub item_type: String,
    pub book: String,
    /// Printed page number.
    pub page: usize,
    pub policy: FormattingPolicy,
}

impl CatalogEntry {
    pub fn new(
        item: &CatalogItem,
        item_type: &str,
        policy: FormattingPolicy,
        overrides: &OverrideTable,
    ) -> Self {
        let over = overrides.get(&item.name);
        let pick = |f: fn(&Override) -> Option<String>| over.and_then(f);
        CatalogEntry {
            name: item.name.clone(),
            search_name: pick(|o| o.name.clone()).unwrap_or_else(|| item.name.clone()),
            item_type: item_type.to_string(),
            book: pick(|o| o.book.clone()).unwrap_or_else(|| item.reference.book.clone()),
            page: over.and_then(|o| o.page).unwrap_or(item.reference.page),
            policy,
        }
    }

    /// Physical page index under `offset`.
    pub fn physical_page(&self, offset: i64, page_count: usize) -> Result<usize, Error> {
        let index = self.page as i64 + offset;
        if index < 0 || index as usize >= page_count {
            return Err(Error::PageOutOfRange {
                index,
                count: page_count,
            });
        }
        Ok(index as usize)
    }

    pub fn request(&self, page: usize) -> EntryRequest<'_> {
        EntryRequest {
            name: &self.name,
            search_name: &self.search_name,
            item_type: &self.item_type,
            book: &self.book,
            page,
            policy: &self.policy,
        }
    }
}

/// One catalog data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogPart {
    Clans,
    AdvantagesDisadvantages,
    Techniques,
    Schools,
    /// A flat `<item_type>s.json` list.
    Items(String),
}

impl CatalogPart {
    /// The structured parts, in extraction order.
    pub const STRUCTURED: [CatalogPart; 4] = [
        CatalogPart::Clans,
        CatalogPart::AdvantagesDisadvantages,
        CatalogPart::Techniques,
        CatalogPart::Schools,
    ];

    /// File name without the `.json` extension.
    pub fn file_stem(&self) -> String {
        match self {
            CatalogPart::Clans => "clans".to_string(),
            CatalogPart::AdvantagesDisadvantages => "advantages_disadvantages".to_string(),
            CatalogPart::Techniques => "techniques".to_string(),
            CatalogPart::Schools => "schools".to_string(),
            CatalogPart::Items(item_type) => format!("{item_type}s"),
        }
    }
}

/// Parsed catalog data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub clans: Vec<Clan>,
    pub advantage_lists: Vec<EntryList>,
    pub techniques: Vec<TechniqueType>,
    pub schools: Vec<CatalogItem>,
    /// Flat lists as `(item_type, items)`.
    pub items: Vec<(String, Vec<CatalogItem>)>,
}

impl Catalog {
    /// Parse the JSON text of `part` into the catalog.
    pub fn load_part(&mut self, part: &CatalogPart, json: &str) -> Result<(), Error> {
        match part {
            CatalogPart::Clans => self.clans = serde_json::from_str(json)?,
            CatalogPart::AdvantagesDisadvantages => {
                self.advantage_lists = serde_json::from_str(json)?
            }
            CatalogPart::Techniques => self.techniques = serde_json::from_str(json)?,
            CatalogPart::Schools => self.schools = serde_json::from_str(json)?,
            CatalogPart::Items(item_type) => {
                let items = serde_json::from_str(json)?;
                self.items.push((item_type.clone(), items));
            }
        }
        Ok(())
    }

    /// Flatten into lookups: clans and their families, advantage groups,
    /// techniques, schools, then flat item lists.
    pub fn entries(&self, overrides: &OverrideTable, policies: &PolicyTable) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();

        for clan in &self.clans {
            let item = CatalogItem {
                name: clan.name.clone(),
                reference: clan.reference.clone(),
            };
            entries.push(CatalogEntry::new(&item, "clan", policies.get("clan"), overrides));
            for family in &clan.families {
                entries.push(CatalogEntry::new(
                    family,
                    "family",
                    policies.get("family"),
                    overrides,
                ));
            }
        }

        for list in &self.advantage_lists {
            let item_type = singular_item_type(&list.name);
            let fallback = FormattingPolicy {
                cut_to_list: true,
                ..FormattingPolicy::default()
            };
            let policy = policies.get_or(&item_type, fallback);
            for item in &list.entries {
                entries.push(CatalogEntry::new(item, &item_type, policy.clone(), overrides));
            }
        }

        for technique_type in &self.techniques {
            let policy = policies.get(&technique_type.name);
            for subcategory in &technique_type.subcategories {
                for item in &subcategory.techniques {
                    entries.push(CatalogEntry::new(
                        item,
                        &technique_type.name,
                        policy.clone(),
                        overrides,
                    ));
                }
            }
        }

        for school in &self.schools {
            entries.push(CatalogEntry::new(school, "school", policies.get("school"), overrides));
        }

        for (item_type, items) in &self.items {
            let policy = policies.get(item_type);
            for item in items {
                entries.push(CatalogEntry::new(item, item_type, policy.clone(), overrides));
            }
        }

        log::debug!("catalog flattened into {} entries", entries.len());
        entries
    }
}
