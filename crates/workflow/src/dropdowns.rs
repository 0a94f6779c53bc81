//! Reference-data projection: the Project_Data tab as form lookups.
//!
//! The tab is a bundle of parallel columns, not a relational table: each
//! column is an independent list, and cross-column pairs on the same row
//! define the derived maps (site → supervisors, material name → unit/SKU,
//! contractor → firm, remark → auto-fill text).

use std::collections::BTreeMap;

use serde::Serialize;

use sheetfms_schema::{is_blank, MappedRow};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnitInfo {
    pub unit: String,
    pub sku: String,
}

/// Everything the frontend forms need in one response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dropdowns {
    pub sites: Vec<String>,
    pub supervisors: Vec<String>,
    pub material_types: Vec<String>,
    pub material_names: Vec<String>,
    pub units: Vec<String>,
    pub contractor_names: Vec<String>,
    pub site_supervisor_map: BTreeMap<String, Vec<String>>,
    pub material_map: BTreeMap<String, Vec<String>>,
    pub unit_map: BTreeMap<String, UnitInfo>,
    pub contractor_firm_map: BTreeMap<String, String>,
    pub remarks_to_auto_fill_map: BTreeMap<String, String>,
}

/// Build the dropdown bundle from projected reference rows. Lists keep
/// first-seen order and drop duplicates; maps keep the first value seen
/// for a key (the sheet convention when rows repeat).
pub fn build_dropdowns(rows: &[MappedRow]) -> Dropdowns {
    let mut sites = Vec::new();
    let mut supervisors = Vec::new();
    let mut material_types = Vec::new();
    let mut material_names = Vec::new();
    let mut units = Vec::new();
    let mut contractor_names = Vec::new();
    let mut site_supervisor_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut material_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut unit_map: BTreeMap<String, UnitInfo> = BTreeMap::new();
    let mut contractor_firm_map: BTreeMap<String, String> = BTreeMap::new();
    let mut remarks_map: BTreeMap<String, String> = BTreeMap::new();

    for row in rows {
        let site = row.get("site");
        let supervisor = row.get("supervisor");
        let material_type = row.get("material_type");
        let material_name = row.get("material_name");
        let unit = row.get("unit");
        let sku = row.get("sku");
        let contractor = row.get("contractor_name");
        let firm = row.get("contractor_firm");
        let remark = row.get("remark");
        let auto_fill = row.get("auto_fill");

        push_unique(&mut sites, site);
        push_unique(&mut supervisors, supervisor);
        push_unique(&mut material_types, material_type);
        push_unique(&mut material_names, material_name);
        push_unique(&mut units, unit);
        push_unique(&mut contractor_names, contractor);

        if !is_blank(site) && !is_blank(supervisor) {
            let entry = site_supervisor_map.entry(site.to_string()).or_default();
            push_unique(entry, supervisor);
        }
        if !is_blank(material_type) && !is_blank(material_name) {
            let entry = material_map.entry(material_type.to_string()).or_default();
            push_unique(entry, material_name);
        }
        if !is_blank(material_name) && !unit_map.contains_key(material_name) {
            unit_map.insert(
                material_name.to_string(),
                UnitInfo {
                    unit: unit.to_string(),
                    sku: sku.to_string(),
                },
            );
        }
        if !is_blank(contractor) && !contractor_firm_map.contains_key(contractor) {
            contractor_firm_map.insert(contractor.to_string(), firm.to_string());
        }
        if !is_blank(remark) && !remarks_map.contains_key(remark) {
            remarks_map.insert(remark.to_string(), auto_fill.to_string());
        }
    }

    Dropdowns {
        sites,
        supervisors,
        material_types,
        material_names,
        units,
        contractor_names,
        site_supervisor_map,
        material_map,
        unit_map,
        contractor_firm_map,
        remarks_to_auto_fill_map: remarks_map,
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !is_blank(value) && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
