//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod host;
pub mod user;

// Marketplace Domain
pub mod attachment;
pub mod booking;
pub mod chat;
pub mod homestay;
pub mod menu_item;

// Re-exports
pub use attachment::{Attachment, AttachmentId, AttachmentNew, Photo};
pub use booking::{
    Booking, BookingId, BookingNew, FoodSelection, STATUS_CANCELLED, STATUS_CONFIRMED,
    STATUS_PENDING,
};
pub use chat::{Chat, ChatId, ChatMessage, ChatNew};
pub use homestay::{
    AvailabilitySlot, Homestay, HomestayId, HomestayNew, HomestayUpdate, Location,
};
pub use host::{Host, HostId, HostNew};
pub use menu_item::{MenuItem, MenuItemId, MenuItemNew, MenuItemUpdate};
pub use user::{User, UserId, UserNew, VALID_ROLES};
