pub mod analysis;
pub mod calculator;
pub mod periods;
pub mod policy;
pub mod types;
pub mod validation;

pub use analysis::{analyze_vehicle_margin, MarginAnalysisInput};
pub use calculator::{
    calculate_detailed_margins, calculate_detailed_margins_with_policy, compute_vehicle_margin,
    compute_vehicle_margin_with_policy, round_result,
};
pub use policy::MarginPolicy;
pub use types::{ProfitCategory, ValidationResult, VehicleMarginInput, VehicleMarginResult};
pub use validation::validate_margin_data;
