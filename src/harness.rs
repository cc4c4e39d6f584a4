use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use log::{debug, info};
use serde::Serialize;

use crate::{
    AsyncObject, AsyncStatus, DeepNested, DeepObject, ExternalReferenceObject, LabConfig,
    Listeners, Nested, NestedObject, Subscription, timer::sleep, update_cow,
};


/// Lines recorded for one step of [`MutabilityHarness::run`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    pub phase: String,
    pub lines: Vec<String>,
}
impl PhaseReport {
    pub fn new(phase: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            phase: phase.into(),
            lines,
        }
    }
}
impl std::fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "## {}", self.phase)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutabilityCheck {
    /// The direct object is still the pristine baseline.
    pub direct_reference: bool,
    /// The copy-on-write object is still the pristine baseline.
    pub cow_reference: bool,
    /// Either object's top-level array has reached length 4.
    pub mutation_success: bool,
    /// The copy-on-write object's innermost array has grown.
    pub deep_mutation_check: bool,
}

/// Runs a fixed sequence of mutations against two deep objects, a leaked
/// reference and an asynchronously updated object, recording what it observes.
///
/// All state is owned by the harness; nothing is shared with the todo stores.
pub struct MutabilityHarness {
    baseline: Rc<DeepObject>,
    direct_object: RefCell<Rc<DeepObject>>,
    cow_object: RefCell<Rc<DeepObject>>,
    external_object: RefCell<Rc<RefCell<ExternalReferenceObject>>>,
    async_object: RefCell<AsyncObject>,
    async_delay: Duration,
    pretty_json: bool,
    reports: RefCell<Vec<PhaseReport>>,
    report_listeners: Listeners,
    is_running: Cell<bool>,
}

impl MutabilityHarness {
    pub fn new(config: &LabConfig) -> Self {
        let baseline = DeepObject::pristine();
        Self {
            direct_object: RefCell::new(baseline.clone()),
            cow_object: RefCell::new(baseline.clone()),
            baseline,
            external_object: RefCell::new(Rc::new(RefCell::new(
                ExternalReferenceObject::pristine(),
            ))),
            async_object: RefCell::new(AsyncObject::pristine()),
            async_delay: config.async_delay(),
            pretty_json: config.pretty_json,
            reports: RefCell::new(Vec::new()),
            report_listeners: Listeners::new(),
            is_running: Cell::new(false),
        }
    }

    /// Pristine instance the tracked objects are compared against.
    pub fn baseline(&self) -> &Rc<DeepObject> {
        &self.baseline
    }
    pub fn direct_object(&self) -> Rc<DeepObject> {
        self.direct_object.borrow().clone()
    }
    pub fn cow_object(&self) -> Rc<DeepObject> {
        self.cow_object.borrow().clone()
    }
    pub fn async_object(&self) -> AsyncObject {
        self.async_object.borrow().clone()
    }
    pub fn is_running(&self) -> bool {
        self.is_running.get()
    }

    pub fn reports(&self) -> Vec<PhaseReport> {
        self.reports.borrow().clone()
    }
    /// Registers `f` to run after every appended report and after each clear.
    pub fn subscribe_reports(&self, f: impl Fn() + 'static) -> Subscription {
        self.report_listeners.subscribe(f)
    }

    /// Replaces the direct object with a hand-built copy: `4` appended to the
    /// top-level array and the nested value set to `"mutated"`.
    pub fn direct_mutate(&self) {
        let current = self.direct_object();
        let next = Rc::new(DeepObject {
            nested: Rc::new(Nested {
                array: Rc::new(current.nested.array.iter().copied().chain([4]).collect()),
                object: Rc::new(NestedObject {
                    value: "mutated".into(),
                    ..NestedObject::clone(&current.nested.object)
                }),
            }),
            ..DeepObject::clone(&current)
        });
        debug!("harness: direct mutate");
        *self.direct_object.borrow_mut() = next;
    }

    /// Same change as [`direct_mutate`](Self::direct_mutate), through [`update_cow`].
    pub fn cow_mutate(&self) {
        self.update_cow_object(|d| {
            let nested = Rc::make_mut(&mut d.nested);
            Rc::make_mut(&mut nested.array).push(4);
            Rc::make_mut(&mut nested.object).value = "mutated".into();
        });
        debug!("harness: copy-on-write mutate");
    }

    /// Appends `"d"` to the innermost array and sets its sibling value to `"deep-mutated"`.
    pub fn deep_nested_mutate(&self) {
        self.update_cow_object(|d| {
            let nested = Rc::make_mut(&mut d.nested);
            let object = Rc::make_mut(&mut nested.object);
            let deep: &mut DeepNested = Rc::make_mut(&mut object.deep_nested);
            Rc::make_mut(&mut deep.array).push("d".into());
            deep.value = "deep-mutated".into();
        });
        debug!("harness: deep nested mutate");
    }

    pub fn check_deep_nested_mutation(&self) -> bool {
        let cow = self.cow_object();
        let deep = &cow.nested.object.deep_nested;
        deep.value == "deep-mutated" && deep.array.iter().any(|s| s == "d")
    }

    fn update_cow_object(&self, recipe: impl FnOnce(&mut DeepObject)) {
        let next = update_cow(&self.cow_object(), recipe);
        *self.cow_object.borrow_mut() = next;
    }

    pub fn check_mutability(&self) -> MutabilityCheck {
        let direct = self.direct_object();
        let cow = self.cow_object();
        MutabilityCheck {
            direct_reference: Rc::ptr_eq(&direct, &self.baseline),
            cow_reference: Rc::ptr_eq(&cow, &self.baseline),
            mutation_success: direct.nested.array.len() == 4 || cow.nested.array.len() == 4,
            deep_mutation_check: cow.nested.object.deep_nested.array.len() > 3,
        }
    }

    /// Live handle to the held external-reference object.
    ///
    /// Writes through the handle change the harness's own state.
    pub fn external_reference(&self) -> Rc<RefCell<ExternalReferenceObject>> {
        self.external_object.borrow().clone()
    }

    /// Copy of the held external-reference object, isolated from the harness.
    pub fn external_reference_copy(&self) -> ExternalReferenceObject {
        self.external_object.borrow().borrow().clone()
    }

    /// Mutates through [`external_reference`](Self::external_reference) and reports
    /// whether the harness's own object changed.
    pub fn test_external_mutation(&self) -> bool {
        let original_value = self.external_reference_copy().value;
        let handle = self.external_reference();
        {
            let mut external = handle.borrow_mut();
            external.value = "mutated externally".into();
            external.array.push(4);
        }
        let current = self.external_reference_copy();
        let leaked = current.value != original_value || current.array.len() != 3;
        debug!("harness: external mutation leaked={leaked}");
        leaked
    }

    /// Moves the async object to `loading`, waits for the configured delay, then
    /// sets it to `success` with [`AsyncObject::MUTATED_VALUE`].
    pub async fn async_mutate(&self) {
        self.async_object.borrow_mut().status = AsyncStatus::Loading;
        debug!("harness: async mutate started");
        sleep(self.async_delay).await;
        {
            let mut a = self.async_object.borrow_mut();
            a.status = AsyncStatus::Success;
            a.value = AsyncObject::MUTATED_VALUE.into();
        }
        debug!("harness: async mutate completed");
    }

    /// Runs every phase in order, replacing any previous reports.
    ///
    /// Callers must not start a second run, or call [`reset`](Self::reset), before
    /// the returned future completes.
    pub async fn run(&self) {
        info!("harness: run started");
        let _running = RunningGuard::new(&self.is_running);
        self.clear_reports();

        let check = self.check_mutability();
        self.push_report(
            "Initial State",
            vec![
                "Initial Objects:".into(),
                format!("Direct Object: {}", self.to_json(&self.direct_object())),
                format!("Copy-on-write Object: {}", self.to_json(&self.cow_object())),
                String::new(),
                "Reference Checks:".into(),
                format!("Direct Reference Same: {}", check.direct_reference),
                format!("Copy-on-write Reference Same: {}", check.cow_reference),
            ],
        );

        self.direct_mutate();
        self.cow_mutate();
        let check = self.check_mutability();
        self.push_report(
            "Basic Mutations",
            vec![
                "After Basic Mutations:".into(),
                format!(
                    "Direct Mutation Success: {}",
                    self.direct_object().nested.array.len() == 4
                ),
                format!(
                    "Copy-on-write Mutation Success: {}",
                    self.cow_object().nested.array.len() == 4
                ),
                format!("Any Mutation Success: {}", check.mutation_success),
            ],
        );

        let before = self.cow_object();
        self.deep_nested_mutate();
        let after = self.cow_object();
        self.push_report(
            "Deep Nested Mutations",
            vec![
                "After Deep Nested Mutation:".into(),
                format!("Deep Mutation Success: {}", self.check_deep_nested_mutation()),
                format!("Deep Reference Changed: {}", !Rc::ptr_eq(&before, &after)),
                format!(
                    "Sibling Reference Stable: {}",
                    Rc::ptr_eq(&before.reference, &after.reference)
                        && Rc::ptr_eq(&before.nested.array, &after.nested.array)
                ),
            ],
        );

        let leaked = self.test_external_mutation();
        self.push_report(
            "External Reference Test",
            vec![
                "External Reference Mutation Attempt:".into(),
                format!("State Changed by External Mutation: {leaked}"),
                "Note: If true, this indicates a potential issue with immutability!".into(),
            ],
        );

        let a = self.async_object();
        self.push_report(
            "Async Mutation Test - Start",
            vec![
                format!("Initial Async Status: {}", a.status),
                format!("Initial Async Value: {}", a.value),
            ],
        );

        self.async_mutate().await;

        let a = self.async_object();
        self.push_report(
            "Async Mutation Test - Complete",
            vec![
                format!("Final Async Status: {}", a.status),
                format!("Final Async Value: {}", a.value),
            ],
        );

        info!("harness: run finished");
    }

    /// Restores all tracked objects to fresh pristine instances and clears the reports.
    pub fn reset(&self) {
        *self.direct_object.borrow_mut() = self.baseline.clone();
        *self.cow_object.borrow_mut() = self.baseline.clone();
        *self.external_object.borrow_mut() =
            Rc::new(RefCell::new(ExternalReferenceObject::pristine()));
        *self.async_object.borrow_mut() = AsyncObject::pristine();
        self.is_running.set(false);
        self.clear_reports();
        info!("harness: reset");
    }

    fn push_report(&self, phase: &str, lines: Vec<String>) {
        debug!("harness: phase `{phase}` recorded");
        self.reports.borrow_mut().push(PhaseReport::new(phase, lines));
        self.report_listeners.notify();
    }
    fn clear_reports(&self) {
        self.reports.borrow_mut().clear();
        self.report_listeners.notify();
    }

    fn to_json(&self, value: &impl Serialize) -> String {
        let json = if self.pretty_json {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

/// Marks a run as in flight until dropped, including when the run future is dropped early.
struct RunningGuard<'a>(&'a Cell<bool>);

impl<'a> RunningGuard<'a> {
    fn new(is_running: &'a Cell<bool>) -> Self {
        is_running.set(true);
        Self(is_running)
    }
}
impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Default for MutabilityHarness {
    fn default() -> Self {
        Self::new(&LabConfig::default())
    }
}
