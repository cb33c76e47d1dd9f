use serde::{Deserialize, Serialize};

/// Mixing priority. `MustPlay` sorts highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    MustPlay,
    High,
    MediumHigh,
    Medium,
    MediumLow,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 6] = [
        Priority::MustPlay,
        Priority::High,
        Priority::MediumHigh,
        Priority::Medium,
        Priority::MediumLow,
        Priority::Low,
    ];

    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.table_name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn table_name(self) -> &'static str {
        match self {
            Priority::MustPlay => "Must Play",
            Priority::High => "High",
            Priority::MediumHigh => "Medium-High",
            Priority::Medium => "Medium",
            Priority::MediumLow => "Medium-Low",
            Priority::Low => "Low",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Priority::MustPlay => 5,
            Priority::High => 4,
            Priority::MediumHigh => 3,
            Priority::Medium => 2,
            Priority::MediumLow => 1,
            Priority::Low => 0,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleType {
    #[default]
    Sequential,
    Random,
}

impl CycleType {
    pub fn from_table_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("sequential") {
            Some(CycleType::Sequential)
        } else if name.eq_ignore_ascii_case("random") {
            Some(CycleType::Random)
        } else {
            None
        }
    }
}

/// Inclusive float range; a fixed value has `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    min: f32,
    max: f32,
}

impl UniformRange {
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(a: f32, b: f32) -> Self {
        if b < a {
            Self { min: b, max: a }
        } else {
            Self { min: a, max: b }
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

impl Default for UniformRange {
    fn default() -> Self {
        Self::fixed(1.0)
    }
}

/// 3D attenuation distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attenuation {
    pub min: i32,
    pub max: i32,
}
