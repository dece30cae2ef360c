//! The fixed authorization table.
//!
//! | Resource     | Action                  | Admin                  | Owning user | Other user |
//! |--------------|-------------------------|------------------------|-------------|------------|
//! | AdminAccount | List/View/Create/Update | allow                  | deny        | deny       |
//! | AdminAccount | Delete                  | allow, except self     | deny        | deny       |
//! | Post         | List/Create             | allow                  | allow       | allow      |
//! | Post         | View/Update/Delete      | allow                  | allow       | deny       |

use pressroom_core::{Post, Principal, PrincipalId};

/// The actions a principal can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    View,
    Create,
    Update,
    Delete,
}

/// What an action is aimed at.
///
/// Collection targets (`Posts`, `Admins`) carry no instance; instance
/// targets carry just enough of the record to decide ownership.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// The post collection (List, Create).
    Posts,
    /// A specific post.
    Post(&'a Post),
    /// The admin account collection (List, Create).
    Admins,
    /// A specific admin account.
    Admin(PrincipalId),
}

/// Decide whether `principal` may perform `action` on `target`.
///
/// Pure predicate with no side effects. Denial here is ordinary control
/// flow; only the service layer turns it into a Forbidden result, so a
/// denied probe of a real record is distinguishable from a missing record.
pub fn authorize(principal: &Principal, action: Action, target: Target<'_>) -> bool {
    match (target, action) {
        // Any authenticated principal can enumerate or create posts; the
        // visibility scope narrows what enumeration returns.
        (Target::Posts | Target::Post(_), Action::List | Action::Create) => true,

        // Instance actions on a post: admins always, otherwise owner only.
        (Target::Post(post), Action::View | Action::Update | Action::Delete) => {
            principal.is_admin() || post.is_authored_by(principal.id)
        }

        // Instance actions aimed at the bare collection have no record to
        // check against.
        (Target::Posts, Action::View | Action::Update | Action::Delete) => false,

        // Admin accounts are managed exclusively by admins.
        (
            Target::Admins | Target::Admin(_),
            Action::List | Action::View | Action::Create | Action::Update,
        ) => principal.is_admin(),

        // An admin can delete other admins but never itself.
        (Target::Admin(id), Action::Delete) => principal.is_admin() && principal.id != id,
        (Target::Admins, Action::Delete) => false,
    }
}
