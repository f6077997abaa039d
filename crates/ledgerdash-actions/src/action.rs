//! The closed set of dashboard actions.

use std::fmt;
use std::str::FromStr;

/// A dashboard action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Mint the demo token.
    Mint,
    /// Burn the demo token held by the wallet.
    Burn,
    /// Lock lovelace at the contract address.
    Deposit,
    /// Collect everything at the contract address.
    Withdraw,
}

/// How actions are grouped for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionGroup {
    /// Mint and burn.
    Minting,
    /// Deposit and withdraw.
    Spending,
}

impl Action {
    /// Every action, in presentation order.
    pub const ALL: [Action; 4] = [Action::Mint, Action::Burn, Action::Deposit, Action::Withdraw];

    /// Lowercase action name, as used by the inbound trigger.
    pub fn name(self) -> &'static str {
        match self {
            Action::Mint => "mint",
            Action::Burn => "burn",
            Action::Deposit => "deposit",
            Action::Withdraw => "withdraw",
        }
    }

    /// The group this action belongs to.
    pub fn group(self) -> ActionGroup {
        match self {
            Action::Mint | Action::Burn => ActionGroup::Minting,
            Action::Deposit | Action::Withdraw => ActionGroup::Spending,
        }
    }
}

impl ActionGroup {
    /// The actions in this group.
    pub fn actions(self) -> [Action; 2] {
        match self {
            ActionGroup::Minting => [Action::Mint, Action::Burn],
            ActionGroup::Spending => [Action::Deposit, Action::Withdraw],
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionGroup::Minting => f.write_str("Minting"),
            ActionGroup::Spending => f.write_str("Spending"),
        }
    }
}

/// An action name that is not one of the four actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
        assert_eq!("Withdraw".parse::<Action>().unwrap(), Action::Withdraw);
        assert_eq!("stake".parse::<Action>(), Err(UnknownAction("stake".into())));
    }

    #[test]
    fn groups_partition_actions() {
        for group in [ActionGroup::Minting, ActionGroup::Spending] {
            for action in group.actions() {
                assert_eq!(action.group(), group);
            }
        }
    }
}
