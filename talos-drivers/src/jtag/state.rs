//! TAP controller states and the TMS routing table

/// State of the target's TAP controller, as tracked by the adapter.
///
/// The sixteen standard states are preceded by five `Unknown` pseudo
/// states: a freshly initialised adapter has no idea where the target's
/// controller sits, so it walks the unknown chain with TMS held high.
/// Five TMS-high clocks force any TAP into `Reset` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapState {
    Unknown,
    Unknown2,
    Unknown3,
    Unknown4,
    Unknown5,
    Reset,
    Idle,
    DrSelect,
    DrCapture,
    DrShift,
    DrExit1,
    DrPause,
    DrExit2,
    DrUpdate,
    IrSelect,
    IrCapture,
    IrShift,
    IrExit1,
    IrPause,
    IrExit2,
    IrUpdate,
}

impl TapState {
    pub(crate) fn is_unknown(self) -> bool {
        matches!(
            self,
            TapState::Unknown
                | TapState::Unknown2
                | TapState::Unknown3
                | TapState::Unknown4
                | TapState::Unknown5
        )
    }

    fn is_dr_substate(self) -> bool {
        matches!(
            self,
            TapState::DrCapture
                | TapState::DrShift
                | TapState::DrExit1
                | TapState::DrPause
                | TapState::DrExit2
                | TapState::DrUpdate
        )
    }

    fn is_ir_substate(self) -> bool {
        matches!(
            self,
            TapState::IrCapture
                | TapState::IrShift
                | TapState::IrExit1
                | TapState::IrPause
                | TapState::IrExit2
                | TapState::IrUpdate
        )
    }

    /// The exit-1 state left by a TMS-high clock out of a shift state.
    pub(crate) fn exit_one(self) -> TapState {
        match self {
            TapState::DrShift => TapState::DrExit1,
            TapState::IrShift => TapState::IrExit1,
            other => other,
        }
    }

    /// One TMS decision on the way to `target`: the bit to drive and the
    /// state a clock with that bit lands in.
    ///
    /// Stepping out of `DrExit2`/`IrExit2` toward the exit-1 or pause
    /// state of the same column passes through the shift state and so
    /// clocks one extra bit through the register; that path is
    /// best-effort.
    pub(crate) fn step_toward(self, target: TapState) -> (bool, TapState) {
        use TapState::*;

        match self {
            Unknown => (true, Unknown2),
            Unknown2 => (true, Unknown3),
            Unknown3 => (true, Unknown4),
            Unknown4 => (true, Unknown5),
            Unknown5 => (true, Reset),

            Reset => (false, Idle),
            Idle => (true, DrSelect),

            DrSelect => {
                if target.is_dr_substate() {
                    (false, DrCapture)
                } else {
                    (true, IrSelect)
                }
            }
            DrCapture => {
                if target == DrShift {
                    (false, DrShift)
                } else {
                    (true, DrExit1)
                }
            }
            DrShift => (true, DrExit1),
            DrExit1 => {
                if matches!(target, DrPause | DrExit2 | DrShift) {
                    (false, DrPause)
                } else {
                    (true, DrUpdate)
                }
            }
            DrPause => (true, DrExit2),
            DrExit2 => {
                if matches!(target, DrShift | DrExit1 | DrPause) {
                    (false, DrShift)
                } else {
                    (true, DrUpdate)
                }
            }
            DrUpdate => {
                if target == Idle {
                    (false, Idle)
                } else {
                    (true, DrSelect)
                }
            }

            IrSelect => {
                if target.is_ir_substate() {
                    (false, IrCapture)
                } else {
                    (true, Reset)
                }
            }
            IrCapture => {
                if target == IrShift {
                    (false, IrShift)
                } else {
                    (true, IrExit1)
                }
            }
            IrShift => (true, IrExit1),
            IrExit1 => {
                if matches!(target, IrPause | IrExit2 | IrShift) {
                    (false, IrPause)
                } else {
                    (true, IrUpdate)
                }
            }
            IrPause => (true, IrExit2),
            IrExit2 => {
                if matches!(target, IrShift | IrExit1 | IrPause) {
                    (false, IrShift)
                } else {
                    (true, IrUpdate)
                }
            }
            IrUpdate => {
                if target == Idle {
                    (false, Idle)
                } else {
                    (true, DrSelect)
                }
            }
        }
    }
}
