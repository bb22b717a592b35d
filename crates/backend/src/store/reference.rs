//! Read-only lookup data: location hierarchy, seasons and the crops the
//! crop master starts from.

use contracts::domain::demographics::{Crop, LocationLevel, LookupItem, SeasonPeriod};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub static REFERENCE: Lazy<ReferenceData> = Lazy::new(ReferenceData::demo);

pub struct ReferenceData {
    districts: Vec<LookupItem>,
    /// Children keyed by (level of the children, parent id).
    children: HashMap<(LocationLevel, String), Vec<LookupItem>>,
    /// SHGs per village, each tagged with its VO.
    shgs: HashMap<String, Vec<(String, LookupItem)>>,
    pub crops: Vec<Crop>,
    pub seasons: Vec<SeasonPeriod>,
}

impl ReferenceData {
    /// Entries of `level` under `parent_id`.
    ///
    /// Administrative levels answer an empty list for unknown parents. VO and
    /// SHG answer `None` for villages without any organisation data.
    pub fn locations(
        &self,
        level: LocationLevel,
        parent_id: &str,
        vo_filter: Option<&str>,
    ) -> Option<Vec<LookupItem>> {
        match level {
            LocationLevel::District => Some(self.districts.clone()),
            LocationLevel::Mandal | LocationLevel::Panchayat | LocationLevel::Village => Some(
                self.children
                    .get(&(level, parent_id.to_string()))
                    .cloned()
                    .unwrap_or_default(),
            ),
            LocationLevel::Vo => self.children.get(&(level, parent_id.to_string())).cloned(),
            LocationLevel::Shg => self.shgs.get(parent_id).map(|groups| {
                groups
                    .iter()
                    .filter(|(vo, _)| vo_filter.map_or(true, |wanted| wanted == vo))
                    .map(|(_, item)| item.clone())
                    .collect()
            }),
        }
    }

    fn demo() -> Self {
        let mut children = HashMap::new();
        let mut add = |level: LocationLevel, parent: &str, items: &[(&str, &str)]| {
            children.insert(
                (level, parent.to_string()),
                items.iter().map(|(id, name)| LookupItem::new(*id, *name)).collect(),
            );
        };

        add(LocationLevel::Mandal, "D001", &[("M001", "Hindupur"), ("M002", "Penukonda"), ("M003", "Dharmavaram")]);
        add(LocationLevel::Mandal, "D002", &[("M004", "Adoni"), ("M005", "Yemmiganur"), ("M006", "Mantralayam")]);
        add(LocationLevel::Mandal, "D003", &[("M007", "Kadapa"), ("M008", "Proddatur")]);
        add(LocationLevel::Mandal, "D004", &[("M009", "Tirupati"), ("M010", "Madanapalle")]);
        add(LocationLevel::Mandal, "D005", &[("M011", "Nellore"), ("M012", "Kavali")]);

        add(LocationLevel::Panchayat, "M001", &[("P001", "Lepakshi"), ("P002", "Bukkapatnam")]);
        add(LocationLevel::Panchayat, "M002", &[("P003", "Roddam"), ("P004", "Somandepalli")]);
        add(LocationLevel::Panchayat, "M003", &[("P005", "Mudigubba")]);
        add(LocationLevel::Panchayat, "M004", &[("P006", "Kosigi"), ("P007", "Holagunda")]);
        add(LocationLevel::Panchayat, "M005", &[("P008", "Gonegandla")]);
        add(LocationLevel::Panchayat, "M006", &[("P009", "Mantralayam")]);
        add(LocationLevel::Panchayat, "M007", &[("P010", "Kadapa Town")]);
        add(LocationLevel::Panchayat, "M008", &[("P011", "Proddatur Town")]);
        add(LocationLevel::Panchayat, "M009", &[("P012", "Tirupati Urban")]);
        add(LocationLevel::Panchayat, "M010", &[("P013", "Madanapalle Town")]);
        add(LocationLevel::Panchayat, "M011", &[("P014", "Nellore Urban")]);
        add(LocationLevel::Panchayat, "M012", &[("P015", "Kavali Town")]);

        let villages = [
            ("P001", "V001", "Lepakshi Village"),
            ("P002", "V002", "Bukkapatnam Village"),
            ("P003", "V003", "Roddam Village"),
            ("P004", "V004", "Somandepalli Village"),
            ("P005", "V005", "Mudigubba Village"),
            ("P006", "V006", "Kosigi Village"),
            ("P007", "V007", "Holagunda Village"),
            ("P008", "V008", "Gonegandla Village"),
            ("P009", "V009", "Mantralayam Village"),
            ("P010", "V010", "Kadapa Town"),
            ("P011", "V011", "Proddatur Town"),
            ("P012", "V012", "Tirupati Urban"),
            ("P013", "V013", "Madanapalle Town"),
            ("P014", "V014", "Nellore Urban"),
            ("P015", "V015", "Kavali Town"),
        ];
        for (panchayat, id, name) in villages {
            add(LocationLevel::Village, panchayat, &[(id, name)]);
        }

        add(LocationLevel::Vo, "V001", &[("VO001", "Lepakshi Mahila VO"), ("VO002", "Sri Lakshmi VO")]);
        add(LocationLevel::Vo, "V003", &[("VO003", "Roddam Podupu VO")]);

        let shg = |vo: &str, id: &str, name: &str| (vo.to_string(), LookupItem::new(id, name));
        let shgs = HashMap::from([
            (
                "V001".to_string(),
                vec![
                    shg("VO001", "SHG001", "Lakshmi SHG"),
                    shg("VO001", "SHG002", "Durga SHG"),
                    shg("VO002", "SHG003", "Saraswati SHG"),
                ],
            ),
            ("V003".to_string(), vec![shg("VO003", "SHG004", "Annapurna SHG")]),
        ]);

        let crop = |id: &str, name: &str, variety_id: &str, variety: &str| Crop {
            crop_id: id.to_string(),
            crop_name: Some(name.to_string()),
            crop_variety_id: Some(variety_id.to_string()),
            crop_variety_name: Some(variety.to_string()),
        };
        let season = |season: &str, period: &str| SeasonPeriod {
            season: season.to_string(),
            period: period.to_string(),
        };

        Self {
            districts: [
                ("D001", "Anantapur"),
                ("D002", "Kurnool"),
                ("D003", "Kadapa"),
                ("D004", "Chittoor"),
                ("D005", "Nellore"),
            ]
            .iter()
            .map(|(id, name)| LookupItem::new(*id, *name))
            .collect(),
            children,
            shgs,
            crops: vec![
                crop("C001", "Groundnut", "CV001", "TMV-2"),
                crop("C002", "Red Gram", "CV002", "LRG-41"),
                crop("C003", "Cotton", "CV003", "Bt Cotton"),
                crop("C004", "Paddy", "CV004", "BPT-5204"),
                crop("C005", "Maize", "CV005", "DHM-117"),
            ],
            seasons: vec![
                season("Kharif", "2025-26"),
                season("Rabi", "2025-26"),
                season("Kharif", "2024-25"),
                season("Rabi", "2024-25"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: Option<Vec<LookupItem>>) -> Option<Vec<String>> {
        items.map(|list| list.into_iter().map(|i| i.id).collect())
    }

    #[test]
    fn test_administrative_levels() {
        assert_eq!(REFERENCE.locations(LocationLevel::District, "", None).unwrap().len(), 5);
        assert_eq!(
            ids(REFERENCE.locations(LocationLevel::Mandal, "D001", None)),
            Some(vec!["M001".into(), "M002".into(), "M003".into()])
        );
        assert_eq!(ids(REFERENCE.locations(LocationLevel::Village, "P003", None)), Some(vec!["V003".into()]));
        assert_eq!(REFERENCE.locations(LocationLevel::Panchayat, "M999", None), Some(vec![]));
    }

    #[test]
    fn test_organisations_only_where_known() {
        assert_eq!(
            ids(REFERENCE.locations(LocationLevel::Vo, "V001", None)),
            Some(vec!["VO001".into(), "VO002".into()])
        );
        assert_eq!(REFERENCE.locations(LocationLevel::Vo, "V002", None), None);
        assert_eq!(REFERENCE.locations(LocationLevel::Shg, "V002", None), None);
    }

    #[test]
    fn test_shgs_filtered_by_vo() {
        assert_eq!(REFERENCE.locations(LocationLevel::Shg, "V001", None).unwrap().len(), 3);
        assert_eq!(
            ids(REFERENCE.locations(LocationLevel::Shg, "V001", Some("VO002"))),
            Some(vec!["SHG003".into()])
        );
    }

    #[test]
    fn test_crop_ids_are_unique() {
        let mut ids: Vec<&str> = REFERENCE.crops.iter().map(|c| c.crop_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), REFERENCE.crops.len());
    }
}
