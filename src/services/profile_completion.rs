use crate::models::{AccountType, ProfileModel};

/// Profile state the completion gate looks at.
#[derive(Debug, Clone, Default)]
pub struct CompletionInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub cv: Option<String>,
    pub recruiter_experience: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub company_email: Option<String>,
    pub company_logo: Option<String>,
    pub skills: Vec<String>,
    pub job_preferences: Vec<String>,
    pub work_experience_count: usize,
}

impl CompletionInput {
    pub fn from_profile(profile: &ProfileModel, work_experience_count: usize) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            location: profile.location.clone(),
            bio: profile.bio.clone(),
            profile_picture: profile.profile_picture.clone(),
            cv: profile.cv.clone(),
            recruiter_experience: profile.recruiter_experience.clone(),
            company_name: profile.company_name.clone(),
            company_description: profile.company_description.clone(),
            company_website: profile.company_website.clone(),
            company_email: profile.company_email.clone(),
            company_logo: profile.company_logo.clone(),
            skills: string_list(&profile.skills),
            job_preferences: string_list(&profile.job_preferences),
            work_experience_count,
        }
    }
}

/// Non-blank strings of a JSON array; anything else reads as empty.
pub fn string_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Names of the required fields still missing, in form order.
pub fn missing_fields(account_type: AccountType, input: &CompletionInput) -> Vec<&'static str> {
    let mut missing = Vec::new();
    let mut require = |name: &'static str, ok: bool| {
        if !ok {
            missing.push(name);
        }
    };

    require("first_name", filled(&input.first_name));
    require("last_name", filled(&input.last_name));
    require("email", filled(&input.email));
    require("phone", filled(&input.phone));
    require("location", filled(&input.location));
    require("bio", filled(&input.bio));
    require("profile_picture", filled(&input.profile_picture));

    if account_type.is_employer_like() {
        require("recruiter_experience", filled(&input.recruiter_experience));
        require("company_name", filled(&input.company_name));
        require("company_description", filled(&input.company_description));
        require("company_website", filled(&input.company_website));
        require("company_email", filled(&input.company_email));
        require("company_logo", filled(&input.company_logo));
    } else {
        require("cv", filled(&input.cv));
        require("skills", !input.skills.is_empty());
        require("job_preferences", !input.job_preferences.is_empty());
        require("work_experience", input.work_experience_count > 0);
    }

    missing
}

/// Whether the profile satisfies every field required to leave setup.
pub fn can_proceed(account_type: AccountType, input: &CompletionInput) -> bool {
    missing_fields(account_type, input).is_empty()
}
