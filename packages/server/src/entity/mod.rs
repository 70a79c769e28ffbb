pub mod academic_unit;
pub mod group;
pub mod role;
pub mod specialty;
pub mod teacher;
pub mod teacher_specialty;
pub mod user;
pub mod user_group;
