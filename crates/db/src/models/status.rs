//! Status enums stored by stable symbolic name.
//!
//! Values are persisted as snake_case TEXT and transmitted by name
//! over the wire, never by ordinal, so new values can be appended
//! without renumbering risk.

use serde::{Deserialize, Serialize};

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
        #[serde(rename_all = "snake_case")]
        #[sqlx(type_name = "text", rename_all = "snake_case")]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Stable symbolic name used for storage and the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(format!(
                        concat!("Unknown ", stringify!($name), " name: {}"),
                        other
                    )),
                }
            }
        }
    };
}

define_status_enum! {
    /// Print request lifecycle status.
    RequestStatus {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
        OnHold => "on_hold",
        Paused => "paused",
        WaitingForMaterials => "waiting_for_materials",
        Delivering => "delivering",
        WaitingForPickup => "waiting_for_pickup",
        Completed => "completed",
    }
}

impl RequestStatus {
    /// Whether the request may still be edited by its owner.
    ///
    /// Owner edits are only allowed before work has begun, i.e. while
    /// the request is pending or freshly accepted.
    pub fn owner_editable(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

define_status_enum! {
    /// Filament acquisition request status.
    FilamentRequestStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Ordered => "ordered",
        Received => "received",
    }
}

impl FilamentRequestStatus {
    /// Whether this status marks the request as fulfilled, at which
    /// point a catalog filament may be attached.
    pub fn is_fulfilled(self) -> bool {
        matches!(self, Self::Received)
    }
}

define_status_enum! {
    /// Printer operating state as reported by PrusaLink.
    PrinterState {
        Unknown => "unknown",
        Offline => "offline",
        Idle => "idle",
        Ready => "ready",
        Busy => "busy",
        Printing => "printing",
        Paused => "paused",
        Stopped => "stopped",
        Finished => "finished",
        Error => "error",
    }
}
