//! District model and generators
//!
//! Each generator is a pure function from reference data to the district
//! records of one taxonomy. None of them perform I/O; municipality rows are
//! fetched beforehand by [`crate::fetcher`].

use crate::reference::{find_prefecture, Prefecture, UpperHouseDistrict};
use polimoney_common::db::MunicipalityRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Electoral district taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistrictType {
    /// 衆議院小選挙区 (lower-house single-member district)
    #[serde(rename = "HR")]
    LowerHouse,
    /// 参議院選挙区 (upper-house prefectural or merged district)
    #[serde(rename = "HC")]
    UpperHouse,
    /// 都道府県知事選挙 (prefectural governor)
    #[serde(rename = "PG")]
    Governor,
    /// 都道府県議会選挙区 (prefectural assembly placeholder)
    #[serde(rename = "PA")]
    PrefecturalAssembly,
    /// 市区町村長選挙 (municipal head)
    #[serde(rename = "GM")]
    MunicipalHead,
    /// 市区町村議会選挙 (municipal assembly)
    #[serde(rename = "CM")]
    MunicipalAssembly,
}

impl DistrictType {
    /// Rebuild order used by the reconciliation driver
    pub const ALL: [DistrictType; 6] = [
        DistrictType::LowerHouse,
        DistrictType::UpperHouse,
        DistrictType::Governor,
        DistrictType::PrefecturalAssembly,
        DistrictType::MunicipalHead,
        DistrictType::MunicipalAssembly,
    ];

    /// Two-letter code stored in `districts.type`
    pub fn code(&self) -> &'static str {
        match self {
            DistrictType::LowerHouse => "HR",
            DistrictType::UpperHouse => "HC",
            DistrictType::Governor => "PG",
            DistrictType::PrefecturalAssembly => "PA",
            DistrictType::MunicipalHead => "GM",
            DistrictType::MunicipalAssembly => "CM",
        }
    }

    /// Parse a stored type code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Human-readable label for log output
    pub fn label(&self) -> &'static str {
        match self {
            DistrictType::LowerHouse => "Lower house",
            DistrictType::UpperHouse => "Upper house",
            DistrictType::Governor => "Governor",
            DistrictType::PrefecturalAssembly => "Prefectural assembly",
            DistrictType::MunicipalHead => "Municipal head",
            DistrictType::MunicipalAssembly => "Municipal assembly",
        }
    }

    /// Whether rows of this type are written in size-bounded batches
    pub fn is_municipal(&self) -> bool {
        matches!(
            self,
            DistrictType::MunicipalHead | DistrictType::MunicipalAssembly
        )
    }
}

impl fmt::Display for DistrictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

/// A district record as persisted in the `districts` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    #[serde(rename = "type")]
    pub district_type: DistrictType,
    /// Comma-joined prefecture codes ("13", or "31,32" for a merged district)
    pub prefecture_codes: String,
    /// Present only for municipal (GM/CM) districts
    pub municipality_code: Option<String>,
    pub description: String,
    pub is_active: bool,
}

impl District {
    fn prefecture_wide(
        name: String,
        district_type: DistrictType,
        prefecture_codes: String,
        description: String,
    ) -> Self {
        Self {
            name,
            district_type,
            prefecture_codes,
            municipality_code: None,
            description,
            is_active: true,
        }
    }
}

/// Lower-house single-member districts (HR)
///
/// Emits `seat_count` districts per prefecture, numbered 1..=seat_count,
/// in the order of `seat_counts`. Codes missing from `prefectures` are skipped.
pub fn generate_lower_house(
    prefectures: &[Prefecture],
    seat_counts: &[(&str, u32)],
) -> Vec<District> {
    let mut districts = Vec::new();

    for (code, count) in seat_counts {
        let Some(pref) = find_prefecture(prefectures, code) else {
            continue;
        };
        for n in 1..=*count {
            districts.push(District::prefecture_wide(
                format!("{}第{}区", pref.name, n),
                DistrictType::LowerHouse,
                pref.code.to_string(),
                format!("衆議院小選挙区 {}第{}区", pref.name, n),
            ));
        }
    }

    districts
}

/// Upper-house constituencies (HC)
///
/// The contested seat count is carried only in the description.
pub fn generate_upper_house(entries: &[UpperHouseDistrict]) -> Vec<District> {
    entries
        .iter()
        .map(|d| {
            District::prefecture_wide(
                d.name.to_string(),
                DistrictType::UpperHouse,
                d.prefecture_codes.join(","),
                format!("参議院選挙区 改選定数{}", d.seats),
            )
        })
        .collect()
}

/// Prefectural governor districts (PG), one per prefecture
pub fn generate_governor(prefectures: &[Prefecture]) -> Vec<District> {
    prefectures
        .iter()
        .map(|p| {
            District::prefecture_wide(
                format!("{}知事選挙区", p.name),
                DistrictType::Governor,
                p.code.to_string(),
                format!("{}知事選挙（全県区）", p.name),
            )
        })
        .collect()
}

/// Prefectural assembly districts (PA)
///
/// One prefecture-wide placeholder per prefecture. Ward-level assembly
/// districts are not generated.
pub fn generate_assembly(prefectures: &[Prefecture]) -> Vec<District> {
    prefectures
        .iter()
        .map(|p| {
            District::prefecture_wide(
                format!("{}議会選挙区（全県）", p.name),
                DistrictType::PrefecturalAssembly,
                p.code.to_string(),
                format!("{}議会選挙区（詳細は市区町村単位で登録）", p.name),
            )
        })
        .collect()
}

/// Municipal head districts (GM), one per municipality row
///
/// A row without a city name falls back to `<prefecture>知事選挙区`, the same
/// name the PG generator gives that prefecture.
pub fn generate_municipal_head(municipalities: &[MunicipalityRow]) -> Vec<District> {
    municipalities
        .iter()
        .map(|m| {
            // Prefecture-level registry codes (e.g. 010006) carry no city name
            let name = match city_name(m) {
                Some(city) => format!("{}{}長選挙区", m.prefecture_name, city),
                None => format!("{}知事選挙区", m.prefecture_name),
            };
            municipal_district(
                m,
                name,
                DistrictType::MunicipalHead,
                format!("市区町村長選挙 {}{}", m.prefecture_name, city_name(m).unwrap_or("")),
            )
        })
        .collect()
}

/// Municipal assembly districts (CM), one per municipality row
///
/// A row without a city name falls back to `<prefecture>議会選挙区`, which
/// reads like the prefecture-wide PA district.
pub fn generate_municipal_assembly(municipalities: &[MunicipalityRow]) -> Vec<District> {
    municipalities
        .iter()
        .map(|m| {
            // Prefecture-level registry codes carry no city name
            let name = match city_name(m) {
                Some(city) => format!("{}{}議会選挙区", m.prefecture_name, city),
                None => format!("{}議会選挙区", m.prefecture_name),
            };
            municipal_district(
                m,
                name,
                DistrictType::MunicipalAssembly,
                format!("市区町村議会選挙 {}{}", m.prefecture_name, city_name(m).unwrap_or("")),
            )
        })
        .collect()
}

/// Generate one taxonomy from the compiled reference tables
///
/// Municipal types take their rows from `municipalities`; the other four
/// ignore it.
pub fn generate(district_type: DistrictType, municipalities: &[MunicipalityRow]) -> Vec<District> {
    use crate::reference::{LOWER_HOUSE_SEATS, PREFECTURES, UPPER_HOUSE_DISTRICTS};

    match district_type {
        DistrictType::LowerHouse => generate_lower_house(&PREFECTURES, &LOWER_HOUSE_SEATS),
        DistrictType::UpperHouse => generate_upper_house(&UPPER_HOUSE_DISTRICTS),
        DistrictType::Governor => generate_governor(&PREFECTURES),
        DistrictType::PrefecturalAssembly => generate_assembly(&PREFECTURES),
        DistrictType::MunicipalHead => generate_municipal_head(municipalities),
        DistrictType::MunicipalAssembly => generate_municipal_assembly(municipalities),
    }
}

/// City name, treating an empty string as absent
fn city_name(m: &MunicipalityRow) -> Option<&str> {
    m.city_name.as_deref().filter(|c| !c.is_empty())
}

/// Prefecture code prefix of a municipality code (first two characters)
fn prefecture_prefix(code: &str) -> &str {
    code.get(..2).unwrap_or(code)
}

fn municipal_district(
    m: &MunicipalityRow,
    name: String,
    district_type: DistrictType,
    description: String,
) -> District {
    District {
        name,
        district_type,
        prefecture_codes: prefecture_prefix(&m.code).to_string(),
        municipality_code: Some(m.code.clone()),
        description,
        is_active: true,
    }
}
