//! state
//!
//! Dataset preservation states.
//!
//! Metax stores the state as a bare integer. The codes leave gaps so that new
//! states can be slotted in between existing ones.

use serde::{Deserialize, Serialize};

/// Normalized preservation state of a dataset that has no preservation block.
pub const UNSET_STATE: i64 = -1;

/// Preservation state of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum PreservationState {
    Initialized,
    GeneratingMetadata,
    TechnicalMetadataGenerated,
    TechnicalMetadataGenerationFailed,
    InvalidMetadata,
    MetadataValidationFailed,
    ValidatedMetadataUpdated,
    ValidatingMetadata,
    RejectedByUser,
    MetadataConfirmed,
    AcceptedToDigitalPreservation,
    InPackagingService,
    PackagingFailed,
    SipSentToIngestionInDpresService,
    InDigitalPreservation,
    RejectedInDigitalPreservationService,
    InDissemination,
}

impl PreservationState {
    /// Every state, in ascending code order.
    pub const ALL: [PreservationState; 17] = [
        PreservationState::Initialized,
        PreservationState::GeneratingMetadata,
        PreservationState::TechnicalMetadataGenerated,
        PreservationState::TechnicalMetadataGenerationFailed,
        PreservationState::InvalidMetadata,
        PreservationState::MetadataValidationFailed,
        PreservationState::ValidatedMetadataUpdated,
        PreservationState::ValidatingMetadata,
        PreservationState::RejectedByUser,
        PreservationState::MetadataConfirmed,
        PreservationState::AcceptedToDigitalPreservation,
        PreservationState::InPackagingService,
        PreservationState::PackagingFailed,
        PreservationState::SipSentToIngestionInDpresService,
        PreservationState::InDigitalPreservation,
        PreservationState::RejectedInDigitalPreservationService,
        PreservationState::InDissemination,
    ];

    /// Integer code used by Metax.
    pub fn code(self) -> i64 {
        match self {
            PreservationState::Initialized => 0,
            PreservationState::GeneratingMetadata => 10,
            PreservationState::TechnicalMetadataGenerated => 20,
            PreservationState::TechnicalMetadataGenerationFailed => 30,
            PreservationState::InvalidMetadata => 40,
            PreservationState::MetadataValidationFailed => 50,
            PreservationState::ValidatedMetadataUpdated => 60,
            PreservationState::ValidatingMetadata => 65,
            PreservationState::RejectedByUser => 70,
            PreservationState::MetadataConfirmed => 75,
            PreservationState::AcceptedToDigitalPreservation => 80,
            PreservationState::InPackagingService => 90,
            PreservationState::PackagingFailed => 100,
            PreservationState::SipSentToIngestionInDpresService => 110,
            PreservationState::InDigitalPreservation => 120,
            PreservationState::RejectedInDigitalPreservationService => 130,
            PreservationState::InDissemination => 140,
        }
    }

    /// Comma separated codes, the form Metax expects in query filters.
    pub fn join_codes(states: &[PreservationState]) -> String {
        states
            .iter()
            .map(|s| s.code().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<PreservationState> for i64 {
    fn from(state: PreservationState) -> i64 {
        state.code()
    }
}

impl TryFrom<i64> for PreservationState {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        PreservationState::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| format!("unknown preservation state {}", code))
    }
}

impl std::fmt::Display for PreservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
