pub mod eligibility;
pub mod planner;
