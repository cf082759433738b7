pub mod events;
pub mod group_members;
pub mod participants;
pub mod round_groups;
pub mod rounds;
pub mod saves;

pub use events::Entity as Events;
pub use events::Model as Event;
pub use group_members::Entity as GroupMembers;
pub use group_members::Model as GroupMember;
pub use participants::Entity as Participants;
pub use participants::Model as Participant;
pub use round_groups::Entity as RoundGroups;
pub use round_groups::Model as RoundGroup;
pub use rounds::Entity as Rounds;
pub use rounds::Model as Round;
pub use saves::Entity as Saves;
pub use saves::Model as Save;
