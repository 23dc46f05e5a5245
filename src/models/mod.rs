pub mod account_type;
pub mod channel;
pub mod notification_event;
pub mod profile;
pub mod user;
pub mod user_notification_preference;
pub mod work_experience;

pub use account_type::AccountType;
pub use channel::{Channel, ChannelSettings, NotificationCategory};
pub use notification_event::{Entity as NotificationEvent, Model as NotificationEventModel};
pub use profile::{Entity as Profile, Model as ProfileModel};
pub use user::{Entity as User, Model as UserModel};
pub use user_notification_preference::{
    Entity as UserNotificationPreference, Model as UserNotificationPreferenceModel,
};
pub use work_experience::{Entity as WorkExperience, Model as WorkExperienceModel};
