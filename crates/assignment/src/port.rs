use ays_core::{AssignmentId, ListPort, ScopedReadPort};

use crate::assignment::{Assignment, AssignmentFilter};

/// Assignment reads. Listing and by-id lookup are always institution scoped.
///
/// Anything providing both capabilities is an assignment read port.
pub trait AssignmentReadPort:
    ListPort<Assignment, AssignmentFilter> + ScopedReadPort<Assignment, AssignmentId>
{
}

impl<P> AssignmentReadPort for P where
    P: ListPort<Assignment, AssignmentFilter> + ScopedReadPort<Assignment, AssignmentId> + ?Sized
{
}
