use serde::Serialize;

/// Position of a payment flow session.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    Quoted,
    WaitingForPayment,
    Executing,
    Completed,
    Error,
}

impl FlowState {
    /// Returns whether the flow may move from `self` to `next`.
    ///
    /// Any state may fall back to `Idle` (new quote request or reset) or fail
    /// into `Error`. Forward moves follow the quote, pay, execute order.
    pub fn can_transition_to(self, next: FlowState) -> bool {
        use FlowState::*;
        match (self, next) {
            (_, Idle) | (_, Error) => true,
            (Idle, Quoted) => true,
            (Quoted, WaitingForPayment) => true,
            (WaitingForPayment, Executing) => true,
            (Executing, Completed) => true,
            _ => false,
        }
    }

    /// Whether a quote is expected to be held in this state.
    pub fn holds_quote(self) -> bool {
        matches!(
            self,
            FlowState::Quoted
                | FlowState::WaitingForPayment
                | FlowState::Executing
                | FlowState::Completed
        )
    }
}

/// The five stages of the progress indicator.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Quote,
    Payment,
    Settling,
    Executing,
    Done,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Quote,
        Step::Payment,
        Step::Settling,
        Step::Executing,
        Step::Done,
    ];

    /// 1-based position in the indicator.
    pub fn number(self) -> u8 {
        match self {
            Step::Quote => 1,
            Step::Payment => 2,
            Step::Settling => 3,
            Step::Executing => 4,
            Step::Done => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Quote => "Quote",
            Step::Payment => "Payment",
            Step::Settling => "Settling",
            Step::Executing => "Executing",
            Step::Done => "Done",
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Active,
    Completed,
}

/// Projects a flow state onto one cell of the progress indicator.
///
/// Both payment initiation (step 2) and settlement (step 3) happen while the
/// flow is `WaitingForPayment`; the indicator shows step 3 as active then.
pub fn step_status(state: FlowState, step: Step) -> StepStatus {
    let n = step.number();
    let active = match state {
        FlowState::Idle | FlowState::Error => 1,
        FlowState::Quoted => 2,
        FlowState::WaitingForPayment => 3,
        FlowState::Executing => 4,
        FlowState::Completed => return StepStatus::Completed,
    };
    if n < active {
        StepStatus::Completed
    } else if n == active {
        StepStatus::Active
    } else {
        StepStatus::Pending
    }
}

/// The whole indicator row for `state`.
pub fn step_statuses(state: FlowState) -> [StepStatus; 5] {
    Step::ALL.map(|step| step_status(state, step))
}
