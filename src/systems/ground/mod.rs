mod contact;

pub use contact::{ContactState, GroundCollisionContributor, GroundContact, GroundContactSample};
