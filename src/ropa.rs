//! Record of Processing Activities (ROPA)
//! Static illustrative reference table shown under the sales report.

use serde::Serialize;

/// Header labels, in display order.
pub const ROPA_COLUMNS: [&str; 5] = [
    "Data Type",
    "Purpose",
    "Retention Period",
    "Accessed By",
    "Legal Basis",
];

/// One processing activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RopaEntry {
    pub data_type: &'static str,
    pub purpose: &'static str,
    pub retention_period: &'static str,
    pub accessed_by: &'static str,
    pub legal_basis: &'static str,
}

impl RopaEntry {
    /// Cell values matching `ROPA_COLUMNS`.
    pub fn cells(&self) -> [&'static str; 5] {
        [
            self.data_type,
            self.purpose,
            self.retention_period,
            self.accessed_by,
            self.legal_basis,
        ]
    }
}

static ROPA_ENTRIES: [RopaEntry; 4] = [
    RopaEntry {
        data_type: "Customer Name",
        purpose: "Personalization",
        retention_period: "2 years",
        accessed_by: "Marketing Team",
        legal_basis: "Consent",
    },
    RopaEntry {
        data_type: "Email Address",
        purpose: "Loyalty Program",
        retention_period: "2 years",
        accessed_by: "CRM System",
        legal_basis: "Consent",
    },
    RopaEntry {
        data_type: "Purchase History",
        purpose: "Product Recommendations",
        retention_period: "5 years",
        accessed_by: "Analytics Team",
        legal_basis: "Legitimate Interest",
    },
    RopaEntry {
        data_type: "Country",
        purpose: "Localization",
        retention_period: "5 years",
        accessed_by: "Localization Tool",
        legal_basis: "Contract",
    },
];

pub fn entries() -> &'static [RopaEntry] {
    &ROPA_ENTRIES
}
