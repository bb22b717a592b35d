//! Demo data the mock server starts with.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::approvals::ApplicantDocuments;
use contracts::domain::batches::{Batch, FarmerSource, TraceEvent, TraceFarmer};
use contracts::domain::catchment::{CatchmentRecord, FarmerRecord};
use contracts::enums::{ApplicationStatus, UserRole};

use super::{Account, BatchEntry, CatchmentEntry, FarmerEntry, Store};
use crate::system::auth::password;

pub const ADMIN_PASSWORD: &str = "admin123";
/// Password of every seeded applicant account.
pub const MEMBER_PASSWORD: &str = "password123";

const AGGREGATOR_ID: &str = "AGG-2619283";
const AGGREGATOR_NAME: &str = "Green Earth Aggregators";

/// Demo store with freshly hashed passwords.
pub fn seeded() -> Result<Store> {
    let admin_hash = password::hash_password(ADMIN_PASSWORD)?;
    let member_hash = password::hash_password(MEMBER_PASSWORD)?;
    demo_store(admin_hash, member_hash)
}

fn at(timestamp: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(timestamp)?.with_timezone(&Utc))
}

fn day(date: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date, "%Y-%m-%d")?)
}

fn docs(registration: Option<&str>, pan: Option<&str>, aadhar: Option<&str>) -> ApplicantDocuments {
    ApplicantDocuments {
        registration: registration.map(str::to_string),
        pan: pan.map(str::to_string),
        aadhar: aadhar.map(str::to_string),
    }
}

struct Applicant<'a> {
    user_id: &'a str,
    username: &'a str,
    role: UserRole,
    org_name: &'a str,
    org_type: &'a str,
    email: &'a str,
    mobile: &'a str,
    status: ApplicationStatus,
    documents: ApplicantDocuments,
    created_at: &'a str,
    reviewed_at: Option<&'a str>,
}

impl Applicant<'_> {
    fn into_account(self, password_hash: &str) -> Result<Account> {
        Ok(Account {
            user_id: self.user_id.to_string(),
            username: self.username.to_string(),
            password_hash: password_hash.to_string(),
            role: self.role,
            org_name: self.org_name.to_string(),
            org_type: self.org_type.to_string(),
            email: self.email.to_string(),
            mobile: self.mobile.to_string(),
            phone: None,
            address: None,
            spoc_name: None,
            spoc_mobile: None,
            status: self.status,
            documents: self.documents,
            created_at: at(self.created_at)?,
            reviewed_at: self.reviewed_at.map(at).transpose()?,
        })
    }
}

fn accounts(admin_hash: &str, member_hash: &str) -> Result<Vec<Account>> {
    use ApplicationStatus::*;

    let mut accounts = vec![Account {
        user_id: "ADMIN-001".to_string(),
        username: "admin".to_string(),
        password_hash: admin_hash.to_string(),
        role: UserRole::Admin,
        org_name: "APCNF Administrator".to_string(),
        org_type: String::new(),
        email: "admin@apcnf.gov.in".to_string(),
        mobile: "9000000001".to_string(),
        phone: Some("9000000001".to_string()),
        address: None,
        spoc_name: None,
        spoc_mobile: None,
        status: Approved,
        documents: ApplicantDocuments::default(),
        created_at: at("2025-10-01T09:00:00Z")?,
        reviewed_at: None,
    }];

    let applicants = [
        Applicant {
            user_id: AGGREGATOR_ID,
            username: "greenearth",
            role: UserRole::Aggregator,
            org_name: AGGREGATOR_NAME,
            org_type: "FPO",
            email: "contact@greenearthfpo.org",
            mobile: "9876543210",
            status: Approved,
            documents: docs(
                Some("uploads/AGG-2619283/reg_greenearth.pdf"),
                Some("uploads/AGG-2619283/pan_greenearth.pdf"),
                None,
            ),
            created_at: "2025-11-02T10:15:00Z",
            reviewed_at: Some("2025-11-04T12:00:00Z"),
        },
        Applicant {
            user_id: "AGG-2619280",
            username: "rejectedfpo",
            role: UserRole::Aggregator,
            org_name: "Rejected FPO",
            org_type: "FPO",
            email: "rejected@fpo.org",
            mobile: "9876543200",
            status: Rejected,
            documents: docs(None, None, None),
            created_at: "2025-10-20T08:30:00Z",
            reviewed_at: Some("2025-10-22T16:45:00Z"),
        },
        Applicant {
            user_id: "BUY-3719000",
            username: "approvedretail",
            role: UserRole::Buyer,
            org_name: "Approved Retail Store",
            org_type: "Retailer",
            email: "approved@retail.com",
            mobile: "9876543230",
            status: Approved,
            documents: docs(
                Some("uploads/BUY-3719000/reg_retail.pdf"),
                Some("uploads/BUY-3719000/pan_retail.pdf"),
                None,
            ),
            created_at: "2025-11-10T11:00:00Z",
            reviewed_at: Some("2025-11-12T09:30:00Z"),
        },
        Applicant {
            user_id: "AGG-2619284",
            username: "sunrisefpo",
            role: UserRole::Aggregator,
            org_name: "Sunrise FPO",
            org_type: "FPO",
            email: "sunrise@fpo.org",
            mobile: "9876543211",
            status: Pending,
            documents: docs(None, Some("uploads/AGG-2619284/pan_sunrise.pdf"), None),
            created_at: "2025-12-01T07:45:00Z",
            reviewed_at: None,
        },
        Applicant {
            user_id: "AGG-2619285",
            username: "kisancollective",
            role: UserRole::Aggregator,
            org_name: "Kisan Collective",
            org_type: "Cooperative",
            email: "kisan@collective.in",
            mobile: "9876543212",
            status: Pending,
            documents: docs(
                Some("uploads/AGG-2619285/reg_kisan.pdf"),
                Some("uploads/AGG-2619285/pan_kisan.pdf"),
                None,
            ),
            created_at: "2025-12-03T13:20:00Z",
            reviewed_at: None,
        },
        Applicant {
            user_id: "BUY-3719001",
            username: "metromart",
            role: UserRole::Buyer,
            org_name: "Metro Mart",
            org_type: "Retailer",
            email: "metro@mart.com",
            mobile: "9876543220",
            status: Pending,
            documents: docs(
                Some("uploads/BUY-3719001/reg_metro.pdf"),
                Some("uploads/BUY-3719001/pan_metro.pdf"),
                None,
            ),
            created_at: "2025-12-05T10:05:00Z",
            reviewed_at: None,
        },
    ];
    for applicant in applicants {
        accounts.push(applicant.into_account(member_hash)?);
    }
    Ok(accounts)
}

fn catchments() -> Vec<CatchmentEntry> {
    let entry = |id: &str,
                 location: [&str; 4],
                 village_id: &str,
                 crop: (&str, &str),
                 season: &str,
                 status: ApplicationStatus| {
        let [district, mandal, panchayat, village] = location.map(|s| Some(s.to_string()));
        CatchmentEntry {
            aggregator_id: AGGREGATOR_ID.to_string(),
            village_id: village_id.to_string(),
            crop_id: crop.0.to_string(),
            record: CatchmentRecord {
                id: Some(id.to_string()),
                aggregator_id: Some(AGGREGATOR_ID.to_string()),
                district_name: district,
                mandal_name: mandal,
                panchayat_name: panchayat,
                village_name: village,
                crop_name: Some(crop.1.to_string()),
                season: Some(season.to_string()),
                period: Some("2025-26".to_string()),
                status,
                created_at: None,
            },
        }
    };

    vec![
        entry(
            "ACM-1001",
            ["Anantapur", "Hindupur", "Lepakshi", "Lepakshi Village"],
            "V001",
            ("C001", "Groundnut"),
            "Kharif",
            ApplicationStatus::Approved,
        ),
        entry(
            "ACM-1002",
            ["Anantapur", "Penukonda", "Roddam", "Roddam Village"],
            "V003",
            ("C002", "Red Gram"),
            "Kharif",
            ApplicationStatus::Approved,
        ),
        entry(
            "ACM-1003",
            ["Kurnool", "Adoni", "Kosigi", "Kosigi Village"],
            "V006",
            ("C003", "Cotton"),
            "Rabi",
            ApplicationStatus::Pending,
        ),
    ]
}

fn farmers() -> Vec<FarmerEntry> {
    let farmer = |id: &str, name: &str, category: &str, panchayat: &str, crop: &str, acreage: f64| {
        FarmerEntry {
            aggregator_id: AGGREGATOR_ID.to_string(),
            record: FarmerRecord {
                farmer_id: Some(id.to_string()),
                farmer_name: Some(name.to_string()),
                farmer_category: Some(category.to_string()),
                district_name: Some("TIRUPATI".to_string()),
                mandal_name: Some("CHANDRAGIRI".to_string()),
                panchayat_name: Some(panchayat.to_string()),
                village_name: Some(panchayat.to_string()),
                crop_name: Some(crop.to_string()),
                acreage: Some(acreage),
                status: ApplicationStatus::Approved,
            },
        }
    };

    vec![
        farmer("103220624555172847", "Nirmala Nara", "S2S", "SESHA PURAM", "PADDY", 1.0),
        farmer("103220624555311824", "K.Ellama Konamgi", "S2S", "SESHA PURAM", "PADDY", 1.0),
        farmer("103220624560122311", "K.Gangulamma Konamgi", "S2S", "SESHA PURAM", "MANGO", 1.0),
        farmer("103220624570476915", "Bobba Chaitanya", "S2S", "BHEEMAVARAM", "PADDY", 2.0),
        farmer("103220624572978160", "Indravathi Palem", "S2SW", "SESHA PURAM", "PADDY", 1.15),
    ]
}

fn event(stage: &str, location: &str, timestamp: &str, actor: &str) -> Result<TraceEvent> {
    Ok(TraceEvent {
        stage: stage.to_string(),
        location: Some(location.to_string()),
        timestamp: at(timestamp)?,
        actor: Some(actor.to_string()),
    })
}

fn trace_farmer(id: &str, name: &str, village: &str, crop: &str, acreage: f64, quantity: f64) -> TraceFarmer {
    TraceFarmer {
        farmer_id: id.to_string(),
        name: name.to_string(),
        mandal: Some("Hindupur".to_string()),
        village: Some(village.to_string()),
        crop: Some(crop.to_string()),
        acreage,
        category: Some("S2S".to_string()),
        quantity,
    }
}

fn batches() -> Result<Vec<BatchEntry>> {
    let source = |farmer_id: &str, quantity: f64| FarmerSource {
        farmer_id: farmer_id.to_string(),
        quantity,
        consent: true,
    };

    Ok(vec![
        BatchEntry {
            aggregator_id: AGGREGATOR_ID.to_string(),
            batch: Batch {
                batch_id: "BATCH-2619283-001".to_string(),
                batch_name: Some("Groundnut Batch 1".to_string()),
                crop_name: "Groundnut".to_string(),
                crop_variety: Some("TMV-2".to_string()),
                procurement_date: day("2026-01-05")?,
                expiry_date: Some(day("2026-07-05")?),
                aggregator_name: Some(AGGREGATOR_NAME.to_string()),
                farmer_sources: vec![source("FRM-100201", 150.5), source("FRM-100202", 85.0)],
            },
            season: Some("Kharif".to_string()),
            period: Some("2025-26".to_string()),
            farmers: vec![
                trace_farmer("FRM-100201", "Ramesh Naidu", "Lepakshi Village", "Groundnut", 2.5, 150.5),
                trace_farmer("FRM-100202", "Lakshmi Devi", "Lepakshi Village", "Groundnut", 1.5, 85.0),
            ],
            events: vec![
                event("Harvested", "Lepakshi Village", "2026-01-02T07:30:00Z", "Farmers")?,
                event("Procured", "Hindupur collection centre", "2026-01-05T10:00:00Z", AGGREGATOR_NAME)?,
                event("Quality checked", "Hindupur collection centre", "2026-01-05T15:20:00Z", "QC desk")?,
                event("Dispatched", "Anantapur warehouse", "2026-01-07T06:00:00Z", AGGREGATOR_NAME)?,
            ],
        },
        BatchEntry {
            aggregator_id: AGGREGATOR_ID.to_string(),
            batch: Batch {
                batch_id: "BATCH-2619283-002".to_string(),
                batch_name: Some("Red Gram Batch 1".to_string()),
                crop_name: "Red Gram".to_string(),
                crop_variety: Some("LRG-41".to_string()),
                procurement_date: day("2026-01-06")?,
                expiry_date: None,
                aggregator_name: Some(AGGREGATOR_NAME.to_string()),
                farmer_sources: vec![source("FRM-100203", 200.0), source("FRM-100204", 120.0)],
            },
            season: Some("Kharif".to_string()),
            period: Some("2025-26".to_string()),
            farmers: vec![
                trace_farmer("FRM-100203", "Venkata Reddy", "Roddam Village", "Red Gram", 3.0, 200.0),
                trace_farmer("FRM-100204", "Sujatha Bai", "Roddam Village", "Red Gram", 2.0, 120.0),
            ],
            events: vec![
                event("Procured", "Penukonda collection centre", "2026-01-06T09:15:00Z", AGGREGATOR_NAME)?,
                event("Harvested", "Roddam Village", "2026-01-03T08:00:00Z", "Farmers")?,
                event("Quality checked", "Penukonda collection centre", "2026-01-06T13:40:00Z", "QC desk")?,
            ],
        },
    ])
}

/// Seed data around the demo aggregator, with the given password hashes.
pub fn demo_store(admin_hash: String, member_hash: String) -> Result<Store> {
    Ok(Store::new(
        accounts(&admin_hash, &member_hash)?,
        catchments(),
        farmers(),
        batches()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_store_is_consistent() {
        let store = demo_store("a".into(), "m".into()).unwrap();
        assert_eq!(store.find_by_username("admin").unwrap().role, UserRole::Admin);
        assert_eq!(store.find("AGG-2619283").unwrap().password_hash, "m");

        // every batch source has a farmer on the traceability page
        for batch in store.batches_of(AGGREGATOR_ID) {
            let trace = store.traceability(&batch.batch_id).unwrap();
            for source in &batch.farmer_sources {
                assert!(trace.farmers.iter().any(|f| f.farmer_id == source.farmer_id));
            }
        }
    }

    #[test]
    fn test_events_come_back_in_time_order() {
        let store = demo_store("a".into(), "m".into()).unwrap();
        let trace = store.traceability("BATCH-2619283-002").unwrap();
        let stages: Vec<&str> = trace.timeline().iter().map(|e| e.stage.as_str()).collect();
        assert_eq!(stages, vec!["Harvested", "Procured", "Quality checked"]);
    }
}
