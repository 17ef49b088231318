//! The task vocabulary: every behaviour mode an ant can be in

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Wander toward random nearby points
    #[default]
    Explore,
    /// Walk to the nearest visible food
    MoveToFood,
    /// Pick up food on the current cell
    CollectFood,
    /// Walk to the nearest tunnel and unload
    ReturnHome,
    /// Convert soil into tunnel
    DigTunnel,
    /// Trail the nearest ant and socialise
    FollowAnt,
    /// Stand still and recover energy
    Rest,
    /// Assist a nearby collector or digger
    HelpAnt,
}

impl TaskKind {
    /// Every task, in the order the oracle vocabulary lists them
    pub const ALL: [TaskKind; 8] = [
        TaskKind::Explore,
        TaskKind::MoveToFood,
        TaskKind::CollectFood,
        TaskKind::ReturnHome,
        TaskKind::DigTunnel,
        TaskKind::FollowAnt,
        TaskKind::Rest,
        TaskKind::HelpAnt,
    ];

    /// Wire label used with the decision oracle
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Explore => "explore",
            TaskKind::MoveToFood => "move_to_food",
            TaskKind::CollectFood => "collect_food",
            TaskKind::ReturnHome => "return_home",
            TaskKind::DigTunnel => "dig_tunnel",
            TaskKind::FollowAnt => "follow_ant",
            TaskKind::Rest => "rest",
            TaskKind::HelpAnt => "help_ant",
        }
    }

    /// Exact label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|task| task.label() == label)
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
