pub mod json;
pub mod terminal;

use crate::engine::DashboardSummary;

pub trait Reporter {
    fn report(&self, summary: &DashboardSummary) -> String;
}
