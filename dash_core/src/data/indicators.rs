use super::DropdownOption;

pub const DEFAULT_INDICATOR: &str = "GDP growth (annual %)";

/// World Bank indicators offered by the dashboard, grouped by category
pub const INDICATORS: &[(&str, &[&str])] = &[
    (
        "World view",
        &[
            "Population density (people per sq. km of land area)",
            "GNI per capita, PPP (current international $)",
        ],
    ),
    (
        "People",
        &[
            "Income share held by lowest 20%",
            "Life expectancy at birth, total (years)",
            "Fertility rate, total (births per woman)",
            "Gross enrollment ratio, primary, both sexes (%)",
            "Gross enrolment ratio, secondary, both sexes (%)",
            "Prevalence of HIV, total (% of population ages 15-49)",
        ],
    ),
    (
        "Environment",
        &[
            "Energy use (kg of oil equivalent per capita)",
            "CO2 emissions (metric tons per capita)",
            "Electric power consumption (kWh per capita)",
        ],
    ),
    (
        "Economy",
        &[
            "GDP growth (annual %)",
            "Inflation, GDP deflator (annual %)",
            "Agriculture, value added (% of GDP)",
            "Industry, value added (% of GDP)",
            "Services, etc., value added (% of GDP)",
            "Exports of goods and services (% of GDP)",
            "Imports of goods and services (% of GDP)",
            "Revenue, excluding grants (% of GDP)",
            "Net lending (+) / net borrowing (-) (% of GDP)",
        ],
    ),
    (
        "States and market",
        &[
            "Time required to start a business (days)",
            "Domestic credit provided by financial sector (% of GDP)",
            "Tax revenue (% of GDP)",
            "Military expenditure (% of GDP)",
            "Mobile cellular subscriptions (per 100 people)",
            "Internet users (per 100 people)",
            "High-technology exports (% of manufactured exports)",
        ],
    ),
];

/// Category headers (disabled) each followed by their indicators
pub fn indicator_options() -> Vec<DropdownOption> {
    let mut options = Vec::new();
    for (category, names) in INDICATORS {
        options.push(DropdownOption::header(*category));
        options.extend(names.iter().map(|n| DropdownOption::new(*n, *n)));
    }
    options
}

pub fn category_of(indicator: &str) -> Option<&'static str> {
    INDICATORS
        .iter()
        .find(|(_, names)| names.iter().any(|n| *n == indicator))
        .map(|(category, _)| *category)
}
