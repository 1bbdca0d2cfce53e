pub const DATA_STRUCTURES: &[&str] = &["Array", "Hash Map"];
pub const TIME_COMPLEXITIES: &[&str] = &["O(1)", "O(n)", "O(n^2)"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

/// Unlock-on-match gate in front of the code editor. The user picks a data
/// structure and a time complexity; the gate opens only when both equal the
/// expected pair. Unlocking is permanent for the session.
#[derive(Clone, Debug)]
pub struct LogicGate {
    expected_ds: String,
    expected_tc: String,
    state: GateState,
    ds_choices: Vec<String>,
    tc_choices: Vec<String>,
    ds_selected: Option<usize>,
    tc_selected: Option<usize>,
}

impl LogicGate {
    pub fn new(expected_ds: &str, expected_tc: &str) -> Self {
        Self {
            expected_ds: expected_ds.to_string(),
            expected_tc: expected_tc.to_string(),
            state: GateState::Locked,
            ds_choices: choices_with(DATA_STRUCTURES, expected_ds),
            tc_choices: choices_with(TIME_COMPLEXITIES, expected_tc),
            ds_selected: None,
            tc_selected: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == GateState::Locked
    }

    /// Compare a pair of choices against the expected pair.
    pub fn check(&mut self, ds: &str, tc: &str) -> GateState {
        if self.state == GateState::Unlocked {
            return self.state;
        }
        if ds == self.expected_ds && tc == self.expected_tc {
            self.state = GateState::Unlocked;
            tracing::debug!(ds, tc, "logic gate unlocked");
        }
        self.state
    }

    pub fn ds_choice(&self) -> Option<&str> {
        self.ds_selected.map(|i| self.ds_choices[i].as_str())
    }

    pub fn tc_choice(&self) -> Option<&str> {
        self.tc_selected.map(|i| self.tc_choices[i].as_str())
    }

    pub fn cycle_ds(&mut self, forward: bool) {
        self.ds_selected = cycle(self.ds_selected, self.ds_choices.len(), forward);
    }

    pub fn cycle_tc(&mut self, forward: bool) {
        self.tc_selected = cycle(self.tc_selected, self.tc_choices.len(), forward);
    }

    /// Check the current dropdown selections. An incomplete selection never
    /// matches.
    pub fn check_selection(&mut self) -> GateState {
        match (self.ds_choice(), self.tc_choice()) {
            (Some(ds), Some(tc)) => {
                let (ds, tc) = (ds.to_string(), tc.to_string());
                self.check(&ds, &tc)
            }
            _ => self.state,
        }
    }
}

fn choices_with(defaults: &[&str], expected: &str) -> Vec<String> {
    let mut out: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
    if !out.iter().any(|c| c == expected) {
        out.push(expected.to_string());
    }
    out
}

fn cycle(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    })
}
