//! Search instruction builders.

/// Suffix the search backend appends so results carry career details in `content`.
pub const PROFILE_DETAIL_SUFFIX: &str =
    "get Name, Position, complete work history and experience and previous roles in content Section";

/// Web-wide instruction for a role at a company. Always contains both literals.
pub fn build_search_instruction(company: &str, search_term: &str) -> String {
    format!("{} at {}.", search_term.trim(), company.trim())
}

/// Instruction restricted to LinkedIn profile pages.
pub fn build_linkedin_instruction(company: &str, title: &str) -> String {
    format!(
        "{} {} site:linkedin.com {}",
        title.trim(),
        company.trim(),
        PROFILE_DETAIL_SUFFIX
    )
}

/// Adds the profile-detail suffix unless the instruction already carries it.
pub fn with_profile_details(instruction: &str) -> String {
    if instruction.contains(PROFILE_DETAIL_SUFFIX) {
        instruction.to_string()
    } else {
        format!("{} {}", instruction.trim_end(), PROFILE_DETAIL_SUFFIX)
    }
}
