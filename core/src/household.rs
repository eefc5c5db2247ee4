use plans4you_protocol::HealthcareFormValues;

/// Federal poverty guideline for a single-person household, in USD.
pub const FPL_BASE: f64 = 14580.0;
/// Added per additional household member.
pub const FPL_PER_ADDITIONAL_MEMBER: f64 = 5140.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdSummary {
    pub size: u32,
    pub poverty_line: f64,
    /// Income as a percentage of the poverty line, one decimal place.
    pub income_percent_of_fpl: f64,
}

impl HouseholdSummary {
    pub fn from_form(form: &HealthcareFormValues) -> Self {
        let size = form.dependents.saturating_add(1);
        let poverty_line = FPL_BASE + f64::from(size - 1) * FPL_PER_ADDITIONAL_MEMBER;
        let percent = form.income / poverty_line * 100.0;
        Self {
            size,
            poverty_line,
            income_percent_of_fpl: (percent * 10.0).round() / 10.0,
        }
    }

    pub fn describe(&self, name: &str) -> String {
        format!(
            "{name}, your household size is {} and your income is {:.1}% of the Federal Poverty Level.",
            self.size, self.income_percent_of_fpl
        )
    }
}
