use serde::{Deserialize, Serialize};

/// The channel through which a transaction was made. ING exports carry both the Dutch channel
/// name (field 7) and a two-letter code (field 4); each name has exactly one code.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum MutationType {
    /// Point-of-sale payment.
    Betaalautomaat,
    /// Miscellaneous.
    Diversen,
    /// Internet banking transfer.
    Internetbankieren,
    /// ATM withdrawal.
    Geldautomaat,
    /// Direct debit.
    Incasso,
    /// Transfer.
    Overschrijving,
    /// Bulk payment.
    Verzamelbetaling,
}

serde_plain::derive_display_from_serialize!(MutationType);
serde_plain::derive_fromstr_from_deserialize!(MutationType);

impl MutationType {
    pub const ALL: [MutationType; 7] = [
        MutationType::Betaalautomaat,
        MutationType::Diversen,
        MutationType::Internetbankieren,
        MutationType::Geldautomaat,
        MutationType::Incasso,
        MutationType::Overschrijving,
        MutationType::Verzamelbetaling,
    ];

    /// The canonical two-letter code that accompanies this channel in an export.
    pub fn code(&self) -> &'static str {
        match self {
            MutationType::Betaalautomaat => "BA",
            MutationType::Diversen => "DV",
            MutationType::Internetbankieren => "GT",
            MutationType::Geldautomaat => "GM",
            MutationType::Incasso => "IC",
            MutationType::Overschrijving => "OV",
            MutationType::Verzamelbetaling => "VZ",
        }
    }

    pub fn from_code(code: &str) -> Option<MutationType> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// The direction indicator of field 5.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Outgoing money.
    Af,
    /// Incoming money.
    Bij,
}

serde_plain::derive_display_from_serialize!(Direction);
serde_plain::derive_fromstr_from_deserialize!(Direction);

impl Direction {
    pub fn is_withdrawal(&self) -> bool {
        matches!(self, Direction::Af)
    }
}
