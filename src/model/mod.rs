pub mod ids;
pub mod account;
pub mod contact;
pub mod family;
pub mod reminder;
pub mod record;
pub mod event;

// Re-exports for convenience
pub use ids::Id;
pub use account::Account;
pub use contact::{
    pick_default_avatar_color, Address, AvatarDescriptor, Birthdate, Contact, ContactShort,
    Gender, NameOrder, ProjectionSettings, AVATAR_COLORS,
};
pub use family::{OffspringEdge, ProgenitorEdge, RelationshipEdge};
pub use reminder::{Frequency, Reminder};
pub use record::{Call, Debt, DebtDirection, DebtStatus, Note, Tag};
pub use event::{Event, ObjectType, Operation};
