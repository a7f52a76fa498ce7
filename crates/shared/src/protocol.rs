use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Amount, Envelope, EnvelopeNumber},
    error::DomainError,
};

pub const ENVELOPES_PATH: &str = "/api/envelopes";
pub const SPONSORSHIPS_PATH: &str = "/api/sponsorships";

/// One entry of the `GET /api/envelopes` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeRecord {
    pub number: i64,
    pub amount: f64,
}

impl TryFrom<EnvelopeRecord> for Envelope {
    type Error = DomainError;

    fn try_from(value: EnvelopeRecord) -> Result<Self, Self::Error> {
        Ok(Envelope::new(value.number, Amount::from_dollars(value.amount)?))
    }
}

/// Decodes a catalog response, keeping server order.
pub fn decode_catalog(records: Vec<EnvelopeRecord>) -> Result<Vec<Envelope>, DomainError> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .map(|record| {
            if !seen.insert(record.number) {
                return Err(DomainError::DuplicateEnvelope(record.number));
            }
            Envelope::try_from(record)
        })
        .collect()
}

/// Body of `POST /api/sponsorships`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipRequest {
    pub envelope_number: EnvelopeNumber,
    pub name: String,
    pub email: String,
    pub address: String,
}
