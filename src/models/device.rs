use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Storage capacity of the traded-in device.
///
/// Parsing never fails: anything outside the named capacities is kept verbatim
/// in [`StorageCapacity::Other`] and priced with the neutral multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageCapacity {
    Gb64,
    Gb128,
    Gb256,
    Gb512,
    Tb1,
    Other(String),
}

impl StorageCapacity {
    /// Every capacity with its own multiplier, smallest first
    pub const NAMED: [StorageCapacity; 5] = [
        StorageCapacity::Gb64,
        StorageCapacity::Gb128,
        StorageCapacity::Gb256,
        StorageCapacity::Gb512,
        StorageCapacity::Tb1,
    ];

    /// Parse the storefront label (`"64GB"` .. `"1TB"`), case-sensitive
    pub fn parse(s: &str) -> Self {
        match s {
            "64GB" => StorageCapacity::Gb64,
            "128GB" => StorageCapacity::Gb128,
            "256GB" => StorageCapacity::Gb256,
            "512GB" => StorageCapacity::Gb512,
            "1TB" => StorageCapacity::Tb1,
            other => StorageCapacity::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StorageCapacity::Gb64 => "64GB",
            StorageCapacity::Gb128 => "128GB",
            StorageCapacity::Gb256 => "256GB",
            StorageCapacity::Gb512 => "512GB",
            StorageCapacity::Tb1 => "1TB",
            StorageCapacity::Other(raw) => raw,
        }
    }

    /// Value multiplier for this capacity; unknown capacities are neutral (1.0)
    pub fn multiplier(&self) -> Decimal {
        match self {
            StorageCapacity::Gb64 | StorageCapacity::Gb128 => Decimal::ONE,
            StorageCapacity::Gb256 => Decimal::new(115, 2),
            StorageCapacity::Gb512 => Decimal::new(135, 2),
            StorageCapacity::Tb1 => Decimal::new(16, 1),
            StorageCapacity::Other(_) => Decimal::ONE,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, StorageCapacity::Other(_))
    }
}

impl From<String> for StorageCapacity {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<StorageCapacity> for String {
    fn from(capacity: StorageCapacity) -> Self {
        capacity.as_str().to_string()
    }
}

impl std::fmt::Display for StorageCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Cosmetic/functional state of the traded-in device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    Other(String),
}

impl DeviceCondition {
    /// Named conditions, best first
    pub const NAMED: [DeviceCondition; 4] = [
        DeviceCondition::Excellent,
        DeviceCondition::Good,
        DeviceCondition::Fair,
        DeviceCondition::Poor,
    ];

    /// Parse the storefront label (`"excellent"` .. `"poor"`), case-sensitive
    pub fn parse(s: &str) -> Self {
        match s {
            "excellent" => DeviceCondition::Excellent,
            "good" => DeviceCondition::Good,
            "fair" => DeviceCondition::Fair,
            "poor" => DeviceCondition::Poor,
            other => DeviceCondition::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeviceCondition::Excellent => "excellent",
            DeviceCondition::Good => "good",
            DeviceCondition::Fair => "fair",
            DeviceCondition::Poor => "poor",
            DeviceCondition::Other(raw) => raw,
        }
    }

    /// Value multiplier for this condition; unknown conditions pay half (0.5)
    pub fn multiplier(&self) -> Decimal {
        match self {
            DeviceCondition::Excellent => Decimal::ONE,
            DeviceCondition::Good => Decimal::new(8, 1),
            DeviceCondition::Fair => Decimal::new(6, 1),
            DeviceCondition::Poor => Decimal::new(3, 1),
            DeviceCondition::Other(_) => Decimal::new(5, 1),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DeviceCondition::Other(_))
    }
}

impl From<String> for DeviceCondition {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<DeviceCondition> for String {
    fn from(condition: DeviceCondition) -> Self {
        condition.as_str().to_string()
    }
}

impl std::fmt::Display for DeviceCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
