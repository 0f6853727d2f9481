use std::collections::{HashMap, HashSet};

use crate::domain::{
    sort_payments_deterministic, BillingPeriod, ExistingPaymentRecord, PaymentId,
    PaymentMethodRef, PricedPeriod,
};
use chrono::NaiveDate;

use super::fee_tier::{FeeChange, FeeSchedule};
use super::immutability::{classify, Mutability};
use super::periods::{generate_periods, BookingRange};
use super::pricer::price_period;
use super::{NewPayment, PaymentUpdate, ReconcileError, ReconciliationResult, ReconciliationSummary};

/// Outcome for a single canonical period or existing record.
enum Decision<'a> {
    Create(PricedPeriod),
    Update(&'a ExistingPaymentRecord, PricedPeriod),
    Unchanged,
    Cancel(&'a ExistingPaymentRecord),
}

/// Accumulator for the reconciliation fold.
struct ChangeSet {
    fees: FeeChange,
    to_create: Vec<NewPayment>,
    to_update: Vec<PaymentUpdate>,
    to_cancel: Vec<PaymentId>,
    net_change_minor: i64,
}

impl ChangeSet {
    fn new(fees: FeeChange) -> Self {
        Self {
            fees,
            to_create: Vec::new(),
            to_update: Vec::new(),
            to_cancel: Vec::new(),
            net_change_minor: 0,
        }
    }

    fn apply(
        mut self,
        decision: Decision<'_>,
        payment_method_ref: &PaymentMethodRef,
    ) -> Result<Self, ReconcileError> {
        match decision {
            Decision::Create(period) => {
                self.add_to_net(Some(period.total_amount_minor))?;
                self.to_create.push(NewPayment {
                    description: period.description(),
                    period,
                    payment_method_ref: payment_method_ref.clone(),
                });
            }
            Decision::Update(record, period) => {
                let update = PaymentUpdate {
                    id: record.id.clone(),
                    due_date: record.due_date,
                    base_amount_minor: period.base_amount_minor,
                    total_amount_minor: period.total_amount_minor,
                    previous_base_amount_minor: record.base_amount_minor,
                    previous_total_amount_minor: record.total_amount_minor,
                };
                self.add_to_net(update.total_delta_minor())?;
                self.to_update.push(update);
            }
            Decision::Unchanged => {}
            Decision::Cancel(record) => {
                self.add_to_net(record.total_amount_minor.checked_neg())?;
                self.to_cancel.push(record.id.clone());
            }
        }
        Ok(self)
    }

    fn add_to_net(&mut self, delta: Option<i64>) -> Result<(), ReconcileError> {
        self.net_change_minor = delta
            .and_then(|d| self.net_change_minor.checked_add(d))
            .ok_or_else(|| {
                ReconcileError::InvalidRange(
                    "payment amounts overflow the net change".to_string(),
                )
            })?;
        Ok(())
    }

    fn finish(self) -> ReconciliationResult {
        let summary = ReconciliationSummary {
            create_count: self.to_create.len(),
            update_count: self.to_update.len(),
            cancel_count: self.to_cancel.len(),
            net_change_minor: self.net_change_minor,
        };
        ReconciliationResult {
            payments_to_create: self.to_create,
            payments_to_update: self.to_update,
            payment_ids_to_cancel: self.to_cancel,
            service_fee_rate_changed: self.fees.changed(),
            old_rate: self.fees.old_rate,
            new_rate: self.fees.new_rate,
            summary,
        }
    }
}

/// Reconciles a booking's persisted payments against a new date range.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    fee_schedule: FeeSchedule,
}

impl Reconciler {
    pub fn new(fee_schedule: FeeSchedule) -> Self {
        Self { fee_schedule }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fee_schedule
    }

    /// Diff the canonical schedule for `new` against `existing`.
    ///
    /// `old` is only used to report the previous fee rate and to check that
    /// the persisted due dates follow the period convention.
    ///
    /// # Errors
    /// - `InvalidRange` for a non-positive monthly price.
    /// - `DuplicateDueDate` / `MisalignedDueDate` when the persisted schedule
    ///   cannot be matched unambiguously.
    /// - `FrozenPaymentRemovalConflict` when a frozen record has no period in
    ///   the new schedule.
    pub fn reconcile(
        &self,
        existing: &[ExistingPaymentRecord],
        old: BookingRange,
        new: BookingRange,
        monthly_price_minor: i64,
        payment_method_ref: &PaymentMethodRef,
    ) -> Result<ReconciliationResult, ReconcileError> {
        if monthly_price_minor <= 0 {
            return Err(ReconcileError::InvalidRange(format!(
                "monthly price must be positive, got {}",
                monthly_price_minor
            )));
        }

        let old_periods = generate_periods(old);
        let new_periods = generate_periods(new);
        let fees = self
            .fee_schedule
            .detect_change(old_periods.len(), new_periods.len());

        let canonical = new_periods
            .iter()
            .map(|period| price_period(period, monthly_price_minor, fees.new_rate))
            .collect::<Result<Vec<_>, _>>()?;

        let mut live: Vec<&ExistingPaymentRecord> =
            existing.iter().filter(|r| !r.is_cancelled()).collect();
        sort_payments_deterministic(&mut live);

        let by_due_date = index_by_due_date(&live)?;
        check_alignment(&live, &old_periods, &new_periods)?;

        tracing::debug!(
            live_payments = live.len(),
            old_periods = old_periods.len(),
            new_periods = new_periods.len(),
            old_rate = %fees.old_rate,
            new_rate = %fees.new_rate,
            "reconciling payment schedule"
        );

        let canonical_dates: HashSet<NaiveDate> = canonical.iter().map(|p| p.due_date()).collect();

        let matched = canonical.into_iter().map(|priced| {
            let decision = match by_due_date.get(&priced.due_date()) {
                None => Decision::Create(priced),
                Some(&record) => match classify(record) {
                    Mutability::Frozen => Decision::Unchanged,
                    Mutability::Mutable if record.amounts() == priced.amounts() => {
                        Decision::Unchanged
                    }
                    Mutability::Mutable => Decision::Update(record, priced),
                },
            };
            Ok(decision)
        });

        let removed = live
            .iter()
            .copied()
            .filter(|record| !canonical_dates.contains(&record.due_date))
            .map(|record| match classify(record) {
                Mutability::Mutable => Ok(Decision::Cancel(record)),
                Mutability::Frozen => Err(ReconcileError::FrozenPaymentRemovalConflict {
                    payment_id: record.id.clone(),
                    due_date: record.due_date,
                }),
            });

        let outcome = matched
            .chain(removed)
            .try_fold(ChangeSet::new(fees), |acc, decision| {
                decision.and_then(|d| acc.apply(d, payment_method_ref))
            });

        match outcome {
            Ok(change_set) => {
                let result = change_set.finish();
                tracing::info!(
                    create = result.summary.create_count,
                    update = result.summary.update_count,
                    cancel = result.summary.cancel_count,
                    fee_rate_changed = result.service_fee_rate_changed,
                    "reconciliation complete"
                );
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "reconciliation rejected");
                Err(err)
            }
        }
    }
}

fn index_by_due_date<'a>(
    live: &[&'a ExistingPaymentRecord],
) -> Result<HashMap<NaiveDate, &'a ExistingPaymentRecord>, ReconcileError> {
    let mut index = HashMap::with_capacity(live.len());
    for record in live {
        if index.insert(record.due_date, *record).is_some() {
            return Err(ReconcileError::DuplicateDueDate {
                due_date: record.due_date,
            });
        }
    }
    Ok(index)
}

/// Every live record must sit on a due date of the old or the new schedule.
fn check_alignment(
    live: &[&ExistingPaymentRecord],
    old_periods: &[BillingPeriod],
    new_periods: &[BillingPeriod],
) -> Result<(), ReconcileError> {
    let known: HashSet<NaiveDate> = old_periods
        .iter()
        .chain(new_periods)
        .map(|p| p.due_date)
        .collect();

    match live.iter().find(|r| !known.contains(&r.due_date)) {
        Some(record) => Err(ReconcileError::MisalignedDueDate {
            payment_id: record.id.clone(),
            due_date: record.due_date,
        }),
        None => Ok(()),
    }
}

/// Reconcile with the default fee schedule.
///
/// Validates both ranges before anything else is computed.
#[allow(clippy::too_many_arguments)]
pub fn reconcile(
    existing: &[ExistingPaymentRecord],
    old_start: NaiveDate,
    old_end: NaiveDate,
    new_start: NaiveDate,
    new_end: NaiveDate,
    monthly_price_minor: i64,
    payment_method_ref: &PaymentMethodRef,
) -> Result<ReconciliationResult, ReconcileError> {
    let old = BookingRange::new(old_start, old_end)?;
    let new = BookingRange::new(new_start, new_end)?;
    Reconciler::default().reconcile(existing, old, new, monthly_price_minor, payment_method_ref)
}
