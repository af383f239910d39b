//! US carriers with SEC identifiers.

use contrail_data::FilingDigest;
use contrail_data::edgar::EdgarClient;
use serde::Serialize;
use std::collections::HashMap;

/// A covered carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Carrier {
    /// Ticker, used as the carrier code in datasets.
    pub code: String,
    /// Registered company name.
    pub name: String,
    /// SEC Central Index Key, without leading zeros.
    pub cik: String,
    /// Brand color as a hex string.
    pub color: String,
    /// Investor relations site.
    pub investor_relations: String,
}

impl Carrier {
    /// Create a new carrier.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        cik: impl Into<String>,
        color: impl Into<String>,
        investor_relations: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            cik: cik.into(),
            color: color.into(),
            investor_relations: investor_relations.into(),
        }
    }
}

/// Registry of the US carriers Contrail covers.
#[derive(Debug, Clone)]
pub struct UsCarriers {
    carriers: Vec<Carrier>,
    code_to_index: HashMap<String, usize>,
}

impl Default for UsCarriers {
    fn default() -> Self {
        Self::new()
    }
}

impl UsCarriers {
    /// Create the registry with the default carriers.
    pub fn new() -> Self {
        let carriers = Self::default_carriers();
        let code_to_index = carriers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.code.clone(), i))
            .collect();

        Self {
            carriers,
            code_to_index,
        }
    }

    /// Get all carriers.
    pub fn carriers(&self) -> &[Carrier] {
        &self.carriers
    }

    /// Get all carrier codes.
    pub fn codes(&self) -> Vec<String> {
        self.carriers.iter().map(|c| c.code.clone()).collect()
    }

    /// Look up a carrier by code, ignoring case.
    pub fn get(&self, code: &str) -> Option<&Carrier> {
        self.code_to_index
            .get(&code.trim().to_uppercase())
            .and_then(|&i| self.carriers.get(i))
    }

    /// SEC CIK of a carrier.
    pub fn cik(&self, code: &str) -> Option<&str> {
        self.get(code).map(|c| c.cik.as_str())
    }

    /// Carrier code to CIK map.
    pub fn cik_map(&self) -> HashMap<String, String> {
        self.carriers
            .iter()
            .map(|c| (c.code.clone(), c.cik.clone()))
            .collect()
    }

    /// Filing digest provider that knows every carrier's CIK.
    pub fn filing_digest(&self, client: EdgarClient) -> FilingDigest {
        FilingDigest::new(client).with_ciks(self.cik_map())
    }

    /// Default carriers.
    fn default_carriers() -> Vec<Carrier> {
        vec![
            Carrier::new(
                "AAL",
                "American Airlines Group Inc.",
                "6201",
                "#9DA6AB",
                "https://americanairlines.gcs-web.com/",
            ),
            Carrier::new(
                "DAL",
                "Delta Air Lines, Inc.",
                "27904",
                "#C01933",
                "https://ir.delta.com/",
            ),
            Carrier::new(
                "UAL",
                "United Airlines Holdings, Inc.",
                "100517",
                "#005DAA",
                "https://ir.united.com/",
            ),
            Carrier::new(
                "ALK",
                "Alaska Air Group, Inc.",
                "766421",
                "#00385F",
                "https://investor.alaskaair.com/",
            ),
            Carrier::new(
                "LUV",
                "Southwest Airlines Co.",
                "92380",
                "#F9B612",
                "https://www.southwestairlinesinvestorrelations.com/",
            ),
        ]
    }
}
