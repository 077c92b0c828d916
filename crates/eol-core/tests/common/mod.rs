// crates/eol-core/tests/common/mod.rs
// ============================================================================
// Module: EOL Core Test Doubles
// Description: In-memory console, traceability, runner, history, and clock.
// Purpose: Drive the sequencer and station cycle without hardware or network.
// ============================================================================

#![allow(dead_code, reason = "Each test binary uses a subset of the doubles.")]

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use eol_core::AlternateSerial;
use eol_core::BackCheck;
use eol_core::Clock;
use eol_core::ConsoleError;
use eol_core::EmployeeId;
use eol_core::HistoryError;
use eol_core::HistorySink;
use eol_core::MissingStepError;
use eol_core::Notice;
use eol_core::OperatorConsole;
use eol_core::PartNumberCheck;
use eol_core::RunRecord;
use eol_core::SerialCheck;
use eol_core::SerialNumber;
use eol_core::StepContext;
use eol_core::StepError;
use eol_core::StepId;
use eol_core::StepOutcome;
use eol_core::StepRunner;
use eol_core::TestSequence;
use eol_core::TraceError;
use eol_core::TraceTimestamp;
use eol_core::Traceability;
use eol_core::Verdict;
use time::Date;
use time::Duration;
use time::Month;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;

// ============================================================================
// SECTION: Console
// ============================================================================

/// Console that replays scripted answers and records notices.
#[derive(Default)]
pub struct ScriptedConsole {
    pub employees: RefCell<VecDeque<Option<String>>>,
    pub serials: RefCell<VecDeque<Option<String>>>,
    pub confirms: RefCell<VecDeque<bool>>,
    pub notices: RefCell<Vec<Notice>>,
    pub employee_prompts: Cell<usize>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employee(self, value: &str) -> Self {
        self.employees.borrow_mut().push_back(Some(value.to_string()));
        self
    }

    pub fn serial(self, value: &str) -> Self {
        self.serials.borrow_mut().push_back(Some(value.to_string()));
        self
    }

    pub fn confirm(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl OperatorConsole for ScriptedConsole {
    fn prompt_employee(&self) -> Result<Option<EmployeeId>, ConsoleError> {
        self.employee_prompts.set(self.employee_prompts.get() + 1);
        Ok(self.employees.borrow_mut().pop_front().flatten().map(EmployeeId::new))
    }

    fn prompt_serial(&self) -> Result<Option<SerialNumber>, ConsoleError> {
        Ok(self.serials.borrow_mut().pop_front().flatten().map(SerialNumber::new))
    }

    fn confirm_image(&self, _message: &str, _image: &Path) -> Result<bool, ConsoleError> {
        self.confirms.borrow_mut().pop_front().ok_or(ConsoleError::Closed)
    }

    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

// ============================================================================
// SECTION: Traceability
// ============================================================================

/// Traceability double with fixed answers and a call log.
pub struct FakeTrace {
    pub enabled: bool,
    pub serial_len: usize,
    pub part_number: PartNumberCheck,
    pub back_check: BackCheck,
    pub insert_error: Option<String>,
    pub calls: Vec<String>,
    pub results: Vec<(Verdict, String, String)>,
    pub alternates: Vec<AlternateSerial>,
}

impl FakeTrace {
    pub fn accepting() -> Self {
        Self {
            enabled: true,
            serial_len: 0,
            part_number: PartNumberCheck::Matched,
            back_check: BackCheck::Cleared { start_time: TraceTimestamp::from_remote("start") },
            insert_error: None,
            calls: Vec::new(),
            results: Vec::new(),
            alternates: Vec::new(),
        }
    }
}

impl Traceability for FakeTrace {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn validate_serial(&mut self, serial: &SerialNumber) -> Result<SerialCheck, TraceError> {
        self.calls.push("validate_serial".to_string());
        if self.serial_len == 0 || serial.char_len() == self.serial_len {
            Ok(SerialCheck::Accepted)
        } else {
            Ok(SerialCheck::Rejected { expected: self.serial_len, actual: serial.char_len() })
        }
    }

    fn validate_part_number(
        &mut self,
        _serial: &SerialNumber,
    ) -> Result<PartNumberCheck, TraceError> {
        self.calls.push("validate_part_number".to_string());
        Ok(self.part_number.clone())
    }

    fn start_test(&mut self) -> Result<BackCheck, TraceError> {
        self.calls.push("start_test".to_string());
        Ok(self.back_check.clone())
    }

    fn end_time(&mut self) -> Result<TraceTimestamp, TraceError> {
        self.calls.push("end_time".to_string());
        Ok(TraceTimestamp::from_remote("end"))
    }

    fn send_result(
        &mut self,
        verdict: Verdict,
        fail_string: &str,
        employee: &EmployeeId,
    ) -> Result<(), TraceError> {
        self.calls.push("send_result".to_string());
        if let Some(reply) = &self.insert_error {
            return Err(TraceError::InsertRejected(reply.clone()));
        }
        self.results.push((verdict, fail_string.to_string(), employee.to_string()));
        Ok(())
    }

    fn send_alternate(&mut self, alternate: &AlternateSerial) -> Result<(), TraceError> {
        self.calls.push("send_alternate".to_string());
        self.alternates.push(alternate.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: Step Runner
// ============================================================================

/// Scripted step behavior.
#[derive(Clone)]
pub enum Script {
    Outcome(StepOutcome),
    Error(String),
}

/// Runner returning scripted outcomes and recording executed steps.
#[derive(Default)]
pub struct ScriptedRunner {
    pub scripts: BTreeMap<String, Script>,
    pub executed: Rc<RefCell<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, step: &str, script: Script) -> Self {
        self.scripts.insert(step.to_string(), script);
        self
    }

    pub fn pass(self, step: &str) -> Self {
        self.with(step, Script::Outcome(StepOutcome::pass()))
    }

    pub fn value(self, step: &str, value: &str) -> Self {
        self.with(step, Script::Outcome(StepOutcome::pass_with(value)))
    }

    pub fn fail(self, step: &str) -> Self {
        self.with(step, Script::Outcome(StepOutcome::fail("scripted failure")))
    }
}

impl StepRunner for ScriptedRunner {
    fn run_step(
        &self,
        step: &StepId,
        _ctx: &mut StepContext<'_>,
    ) -> Result<StepOutcome, StepError> {
        self.executed.borrow_mut().push(step.name().to_string());
        match self.scripts.get(step.name()) {
            Some(Script::Outcome(outcome)) => Ok(outcome.clone()),
            Some(Script::Error(message)) => Err(StepError::Command(message.clone())),
            None => Err(StepError::Failed(format!("unregistered step {step}"))),
        }
    }

    fn validate_steps(&self, sequence: &TestSequence) -> Result<(), MissingStepError> {
        let steps: Vec<String> = sequence
            .steps()
            .iter()
            .filter(|step| !self.scripts.contains_key(step.name()))
            .map(|step| step.name().to_string())
            .collect();
        if steps.is_empty() { Ok(()) } else { Err(MissingStepError { steps }) }
    }
}

// ============================================================================
// SECTION: History and Clock
// ============================================================================

/// History sink that keeps records in memory.
#[derive(Default)]
pub struct MemoryHistory {
    pub records: Vec<RunRecord>,
    pub fail_with: Option<String>,
}

impl HistorySink for MemoryHistory {
    fn append(&mut self, record: &RunRecord) -> Result<(), HistoryError> {
        if let Some(message) = &self.fail_with {
            return Err(HistoryError::Io(message.clone()));
        }
        self.records.push(record.clone());
        Ok(())
    }
}

/// Manually advanced clock shared between the test and the station.
#[derive(Clone)]
pub struct ManualClock(Rc<Cell<OffsetDateTime>>);

impl ManualClock {
    pub fn new() -> Self {
        let date = Date::from_calendar_date(2026, Month::May, 4).unwrap();
        let time = Time::from_hms(8, 0, 0).unwrap();
        Self(Rc::new(Cell::new(PrimitiveDateTime::new(date, time).assume_utc())))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        self.0.get()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves a sequence where every non-builtin name is an application check.
pub fn sequence(names: &[&str]) -> TestSequence {
    let checks = names.iter().map(|name| (*name).to_string()).collect();
    TestSequence::resolve(names, &checks).unwrap()
}
