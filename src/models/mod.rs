pub mod attendance;
pub mod event;
pub mod member;
pub mod membership;
pub mod registration;

pub use attendance::{Attendance, AttendanceStatus};
pub use event::Event;
pub use member::Member;
pub use membership::{Membership, MembershipRole};
pub use registration::Registration;
