//! Scenario Record - the 13-field driving situation submitted for scoring
//!
//! **The column order below is part of the model contract.**
//! A model trained on a different order does not fail, it scores garbage.
//!
//! ## Rules:
//! 1. Add column → increment SCHEMA_VERSION
//! 2. Change order → increment SCHEMA_VERSION
//! 3. Remove column → increment SCHEMA_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// SCHEMA
// ============================================================================

/// Current record layout version
pub const SCHEMA_VERSION: u8 = 1;

/// Column names in the exact order the model was trained against
pub const SCENARIO_COLUMNS: &[&str] = &[
    "Driver_Age",            // 0
    "Time_of_Day",           // 1
    "Driver_Experience",     // 2
    "Number_of_Vehicles",    // 3
    "Traffic_Density",       // 4
    "Road_Type",             // 5
    "Vehicle_Type",          // 6
    "Driver_Alcohol",        // 7
    "Speed_Limit",           // 8
    "Road_Condition",        // 9
    "Road_Light_Condition",  // 10
    "Accident_Severity",     // 11
    "Weather",               // 12
];

/// Must match SCENARIO_COLUMNS.len()
pub const COLUMN_COUNT: usize = 13;

/// CRC32 over version + column names, used to spot layout drift in logs
pub fn schema_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[SCHEMA_VERSION]);
    for name in SCENARIO_COLUMNS {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Columns whose values are enumerated labels rather than integers
pub fn is_categorical(column: &str) -> bool {
    matches!(
        column,
        "Time_of_Day"
            | "Road_Type"
            | "Vehicle_Type"
            | "Road_Condition"
            | "Road_Light_Condition"
            | "Accident_Severity"
            | "Weather"
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaInfo {
    pub version: u8,
    pub hash: u32,
    pub columns: Vec<&'static str>,
}

impl SchemaInfo {
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            hash: schema_hash(),
            columns: SCENARIO_COLUMNS.to_vec(),
        }
    }
}

// ============================================================================
// CATEGORICAL DOMAINS
// ============================================================================

macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in form display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical!(TimeOfDay {
    Morning => "Morning",
    Afternoon => "Afternoon",
    Evening => "Evening",
    Night => "Night",
});

categorical!(RoadType {
    Highway => "Highway",
    Urban => "Urban",
    Rural => "Rural",
});

categorical!(VehicleType {
    Car => "Car",
    Bike => "Bike",
    Truck => "Truck",
    Bus => "Bus",
    Other => "Other",
});

categorical!(RoadCondition {
    Dry => "Dry",
    Wet => "Wet",
    Snow => "Snow",
    Gravel => "Gravel",
});

categorical!(
    /// Road_Light_Condition; note the space in "Low Light"
    LightCondition {
        Day => "Day",
        Night => "Night",
        LowLight => "Low Light",
    }
);

categorical!(AccidentSeverity {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

categorical!(Weather {
    Clear => "Clear",
    Rain => "Rain",
    Fog => "Fog",
    Snow => "Snow",
    Storm => "Storm",
});

// ============================================================================
// RECORD
// ============================================================================

/// One hypothetical driving situation.
///
/// Field declaration order is the column order, so the serialized echo
/// matches what the model sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScenarioRecord {
    #[serde(rename = "Driver_Age")]
    #[validate(range(min = 16, max = 90, message = "Driver_Age must be between 16 and 90"))]
    pub driver_age: i32,

    #[serde(rename = "Time_of_Day")]
    pub time_of_day: TimeOfDay,

    #[serde(rename = "Driver_Experience")]
    #[validate(range(min = 0, max = 50, message = "Driver_Experience must be between 0 and 50"))]
    pub driver_experience: i32,

    #[serde(rename = "Number_of_Vehicles")]
    #[validate(range(min = 1, max = 10, message = "Number_of_Vehicles must be between 1 and 10"))]
    pub number_of_vehicles: i32,

    /// 1 = Low, 2 = Medium, 3 = High
    #[serde(rename = "Traffic_Density")]
    #[validate(range(min = 1, max = 3, message = "Traffic_Density must be 1, 2 or 3"))]
    pub traffic_density: i32,

    #[serde(rename = "Road_Type")]
    pub road_type: RoadType,

    #[serde(rename = "Vehicle_Type")]
    pub vehicle_type: VehicleType,

    /// 0 = No, 1 = Yes
    #[serde(rename = "Driver_Alcohol")]
    #[validate(range(min = 0, max = 1, message = "Driver_Alcohol must be 0 or 1"))]
    pub driver_alcohol: i32,

    #[serde(rename = "Speed_Limit")]
    #[validate(range(min = 10, max = 200, message = "Speed_Limit must be between 10 and 200"))]
    pub speed_limit: i32,

    #[serde(rename = "Road_Condition")]
    pub road_condition: RoadCondition,

    #[serde(rename = "Road_Light_Condition")]
    pub road_light_condition: LightCondition,

    #[serde(rename = "Accident_Severity")]
    pub accident_severity: AccidentSeverity,

    #[serde(rename = "Weather")]
    pub weather: Weather,
}

impl ScenarioRecord {
    /// Cells in SCENARIO_COLUMNS order
    pub fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Integer(self.driver_age as i64),
            Cell::Category(self.time_of_day.as_str()),
            Cell::Integer(self.driver_experience as i64),
            Cell::Integer(self.number_of_vehicles as i64),
            Cell::Integer(self.traffic_density as i64),
            Cell::Category(self.road_type.as_str()),
            Cell::Category(self.vehicle_type.as_str()),
            Cell::Integer(self.driver_alcohol as i64),
            Cell::Integer(self.speed_limit as i64),
            Cell::Category(self.road_condition.as_str()),
            Cell::Category(self.road_light_condition.as_str()),
            Cell::Category(self.accident_severity.as_str()),
            Cell::Category(self.weather.as_str()),
        ]
    }
}

impl Default for ScenarioRecord {
    /// The form's initial values
    fn default() -> Self {
        Self {
            driver_age: 30,
            time_of_day: TimeOfDay::Morning,
            driver_experience: 5,
            number_of_vehicles: 1,
            traffic_density: 1,
            road_type: RoadType::Highway,
            vehicle_type: VehicleType::Car,
            driver_alcohol: 0,
            speed_limit: 60,
            road_condition: RoadCondition::Dry,
            road_light_condition: LightCondition::Day,
            accident_severity: AccidentSeverity::Low,
            weather: Weather::Clear,
        }
    }
}

// ============================================================================
// FRAME
// ============================================================================

/// One table cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Integer(i64),
    Category(&'static str),
}

/// Tabular view handed to a predictor: named columns, one row per record
#[derive(Debug, Clone)]
pub struct ScenarioFrame {
    columns: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

impl ScenarioFrame {
    /// Single-row frame in trained column order
    pub fn single(record: &ScenarioRecord) -> Self {
        Self {
            columns: SCENARIO_COLUMNS.to_vec(),
            rows: vec![record.cells()],
        }
    }

    /// Frame with caller-chosen columns. No shape checks here; the encoder
    /// rejects frames that lack a column it needs.
    pub fn new(columns: Vec<&'static str>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }
}
