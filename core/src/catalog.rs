//! Fixed enumerations the generator and derivations draw from.
//!
//! RULE: These lists are part of the data contract. Order is load-bearing
//! (region tie-breaks, DPD recovery gradients, branch id prefixes) — never
//! reorder, only append where a list is explicitly open-ended. None are.

pub const REGIONS: [&str; 6] = ["North", "South", "East", "West", "Central", "Northeast"];

pub const SECTORS: [&str; 6] = [
    "Retail",
    "Corporate",
    "MSME",
    "Agriculture",
    "Real Estate",
    "Infrastructure",
];

/// Only the first four sectors carry region-level credit cells.
pub const CREDIT_SECTOR_COUNT: usize = 4;

pub const MATURITY_BUCKETS: [&str; 7] = [
    "Overnight",
    "1-7 days",
    "8-30 days",
    "31-90 days",
    "91-365 days",
    "1-5 years",
    "5+ years",
];

pub const CUSTOMER_SEGMENTS: [&str; 6] = [
    "Prime Retail",
    "Mass Retail",
    "Affluent",
    "SME",
    "Corporate",
    "Institutional",
];

pub const FRAUD_CITIES: [&str; 6] = [
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Hyderabad",
];

pub const DPD_BUCKETS: [&str; 5] = ["0-30", "31-60", "61-90", "91-180", "180+"];

/// Representative days-past-due per DPD bucket, same indexing as DPD_BUCKETS.
pub const DPD_DAYS: [u32; 5] = [15, 45, 75, 135, 200];

pub const BRANCH_REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];

pub const BRANCHES_PER_REGION: usize = 3;

pub const REGULATIONS: [&str; 5] = ["RBI LCR", "AML/KYC", "BASEL III", "IFRS 9", "DPDP"];

pub const OPS_RISK_CATEGORIES: [&str; 5] = ["IT", "Cyber", "Process", "Fraud", "External"];

pub const PRODUCTS: [&str; 6] = ["Savings", "Current", "FD", "Loan", "Cards", "Insurance"];

/// Only the first four products appear in the holding matrix.
pub const HOLDING_PRODUCT_COUNT: usize = 4;

pub const CHANNELS: [&str; 4] = ["Mobile", "Internet", "Branch", "ATM"];

/// Six-month window used by every trend series, oldest first.
pub const TREND_MONTHS: [&str; 6] = ["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"];

/// Daily labels for the fraud pulse timeline; VaR history uses the last seven.
pub const TIMELINE_DATES: [&str; 8] = [
    "20 Feb", "21 Feb", "22 Feb", "23 Feb", "24 Feb", "25 Feb", "26 Feb", "27 Feb",
];

/// Drill-down dashboard slugs accepted by the metrics endpoint.
pub const DASHBOARD_SLUGS: [&str; 10] = [
    "credit-risk",
    "liquidity",
    "customer-profitability",
    "fraud",
    "growth",
    "collections",
    "treasury",
    "branch-network",
    "compliance",
    "operational-risk",
];
