//! Channel state: membership, topic, and moderation modes.

use std::collections::HashMap;

use super::session::SessionId;

/// Channel topic with metadata.
#[derive(Debug, Clone)]
pub struct Topic {
    pub text: String,
    pub set_by: String,
    pub set_at: i64,
}

/// Per-member modes. Operator status lives on the member entry, so the
/// operator set is a subset of the member set by construction.
#[derive(Debug, Default, Clone)]
pub struct MemberModes {
    pub op: bool,
}

/// Channel moderation modes.
#[derive(Debug, Default, Clone)]
pub struct ChannelModes {
    pub invite_only: bool,      // +i
    pub topic_restricted: bool, // +t
    pub key: Option<String>,    // +k
    pub limit: Option<u32>,     // +l, None = unlimited
}

/// A chat channel.
#[derive(Debug)]
pub struct Channel {
    pub name: String,
    pub topic: Option<Topic>,
    pub created: i64,
    /// Members: session id -> member modes.
    pub members: HashMap<SessionId, MemberModes>,
    pub modes: ChannelModes,
}

impl Channel {
    /// Create a new channel. Creation happens on first join, and newly
    /// created channels start topic-restricted.
    pub fn new(name: String) -> Self {
        Self {
            name,
            topic: None,
            created: chrono::Utc::now().timestamp(),
            members: HashMap::new(),
            modes: ChannelModes {
                topic_restricted: true,
                ..ChannelModes::default()
            },
        }
    }

    pub fn add_member(&mut self, id: SessionId, modes: MemberModes) {
        self.members.insert(id, modes);
    }

    /// Remove a member (and with it any operator status).
    pub fn remove_member(&mut self, id: SessionId) -> bool {
        self.members.remove(&id).is_some()
    }

    pub fn is_member(&self, id: SessionId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn is_op(&self, id: SessionId) -> bool {
        self.members.get(&id).is_some_and(|m| m.op)
    }

    /// Grant or revoke operator status. Returns false when the target is
    /// not a member; non-members can never hold operator status.
    pub fn set_op(&mut self, id: SessionId, op: bool) -> bool {
        match self.members.get_mut(&id) {
            Some(modes) => {
                modes.op = op;
                true
            }
            None => false,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether a configured user limit is already reached.
    pub fn at_limit(&self) -> bool {
        self.modes
            .limit
            .is_some_and(|limit| self.members.len() >= limit as usize)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.members.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_channel_is_topic_restricted() {
        let channel = Channel::new("#lobby".into());
        assert!(channel.modes.topic_restricted);
        assert!(!channel.modes.invite_only);
        assert_eq!(channel.modes.limit, None);
        assert!(channel.members.is_empty());
    }

    #[test]
    fn operator_requires_membership() {
        let mut channel = Channel::new("#lobby".into());
        assert!(!channel.set_op(7, true));
        assert!(!channel.is_op(7));

        channel.add_member(7, MemberModes { op: false });
        assert!(channel.set_op(7, true));
        assert!(channel.is_op(7));
    }

    #[test]
    fn removing_member_removes_operator() {
        let mut channel = Channel::new("#lobby".into());
        channel.add_member(7, MemberModes { op: true });
        assert!(channel.is_op(7));

        assert!(channel.remove_member(7));
        assert!(!channel.is_op(7));
        assert!(!channel.is_member(7));
    }

    #[test]
    fn at_limit_tracks_membership() {
        let mut channel = Channel::new("#lobby".into());
        channel.add_member(1, MemberModes::default());
        assert!(!channel.at_limit());

        channel.modes.limit = Some(1);
        assert!(channel.at_limit());

        channel.modes.limit = Some(2);
        assert!(!channel.at_limit());

        channel.modes.limit = None;
        assert!(!channel.at_limit());
    }
}
