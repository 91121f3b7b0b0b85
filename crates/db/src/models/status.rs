//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Session lifecycle status.
    SessionStatus {
        Locked = 1,
        Available = 2,
        Completed = 3,
        Cancelled = 4,
    }
}

#[cfg(test)]
mod tests {
    use speakwell_core::session_status;

    use super::*;

    #[test]
    fn session_status_ids_match_seed_data() {
        assert_eq!(SessionStatus::Locked.id(), 1);
        assert_eq!(SessionStatus::Available.id(), 2);
        assert_eq!(SessionStatus::Completed.id(), 3);
        assert_eq!(SessionStatus::Cancelled.id(), 4);
    }

    #[test]
    fn session_status_ids_match_core_constants() {
        assert_eq!(SessionStatus::Locked.id(), session_status::LOCKED);
        assert_eq!(SessionStatus::Available.id(), session_status::AVAILABLE);
        assert_eq!(SessionStatus::Completed.id(), session_status::COMPLETED);
        assert_eq!(SessionStatus::Cancelled.id(), session_status::CANCELLED);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = SessionStatus::Completed.into();
        assert_eq!(id, 3);
    }
}
