//! Autoregressive rollout of a one-step predictor.
//!
//! The model only predicts the next day. To reach `n` days out we feed each
//! prediction back in:
//!
//! ```text
//! Init -> Rolling(0) -> Rolling(1) -> ... -> Rolling(steps - 1) -> Done
//! ```
//!
//! Each `Rolling` step looks up the window for the current date, asks the
//! model for that date's value, and extends the store, which advances the
//! current date by one day. Any model error aborts the whole rollout.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::data::SampleStore;
use crate::domain::calendar::shift_date;
use crate::error::{ForecastError, Result};
use crate::models::Predictor;

/// What a finished rollout hands back. The extended store stays with the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutOutcome {
    /// Last prediction, normalized units.
    pub prediction: f64,
    /// The day the last prediction is for.
    pub prediction_date: NaiveDate,
    /// `prediction_date - look_back` days.
    pub starting_date: NaiveDate,
    /// The date the rollout actually started from.
    pub resolved_start: NaiveDate,
    /// True when the requested date had no row and the latest one was used.
    pub date_adjusted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RolloutState {
    Init,
    Rolling { step: usize, current: NaiveDate },
    /// `next_date` is the row opened by the last extend, one day past the
    /// last prediction.
    Done { last: f64, next_date: NaiveDate },
}

/// Rolls a model forward `steps` times from `requested`, extending `store`.
pub struct Rollout<'a, P: Predictor + ?Sized> {
    store: &'a mut SampleStore,
    model: &'a P,
    requested: NaiveDate,
    steps: usize,
    state: RolloutState,
    resolved_start: Option<NaiveDate>,
    date_adjusted: bool,
}

impl<'a, P: Predictor + ?Sized> Rollout<'a, P> {
    pub fn new(store: &'a mut SampleStore, model: &'a P, requested: NaiveDate, steps: usize) -> Self {
        Self {
            store,
            model,
            requested,
            steps,
            state: RolloutState::Init,
            resolved_start: None,
            date_adjusted: false,
        }
    }

    /// Drive the state machine to `Done`.
    pub fn run(mut self) -> Result<RolloutOutcome> {
        if self.steps == 0 {
            return Err(ForecastError::InvalidRequest("rollout needs at least one step".to_string()));
        }

        loop {
            let state = self.state;
            self.state = match state {
                RolloutState::Init => RolloutState::Rolling {
                    step: 0,
                    current: self.requested,
                },
                RolloutState::Rolling { step, current } => self.advance(step, current)?,
                RolloutState::Done { last, next_date } => return self.finish(last, next_date),
            };
        }
    }

    fn advance(&mut self, step: usize, current: NaiveDate) -> Result<RolloutState> {
        let lookup = self.store.lookup(current)?;
        if step == 0 {
            self.resolved_start = Some(lookup.resolved_date);
            self.date_adjusted = lookup.fell_back;
            if lookup.fell_back {
                warn!(
                    requested = %current,
                    resolved = %lookup.resolved_date,
                    "requested date has no sample; rolling from the latest available date"
                );
            }
        }

        let predicted = self.model.predict(&lookup.window)?;
        if !predicted.is_finite() {
            return Err(ForecastError::ModelInference(format!(
                "non-finite prediction for {}",
                lookup.resolved_date
            )));
        }

        let next = self.store.extend(lookup.resolved_date, predicted)?;
        debug!(step, date = %lookup.resolved_date, predicted, "rollout step");

        if step + 1 == self.steps {
            Ok(RolloutState::Done {
                last: predicted,
                next_date: next,
            })
        } else {
            Ok(RolloutState::Rolling {
                step: step + 1,
                current: next,
            })
        }
    }

    fn finish(&self, last: f64, next_date: NaiveDate) -> Result<RolloutOutcome> {
        let prediction_date = shift_date(next_date, -1)?;
        let look_back = i64::try_from(self.store.look_back())
            .map_err(|_| ForecastError::InvalidRequest("look-back too large".to_string()))?;
        let starting_date = shift_date(prediction_date, -look_back)?;

        Ok(RolloutOutcome {
            prediction: last,
            prediction_date,
            starting_date,
            resolved_start: self.resolved_start.unwrap_or(self.requested),
            date_adjusted: self.date_adjusted,
        })
    }
}

/// Roll `model` forward `steps` times from `requested`.
pub fn roll_forward<P: Predictor + ?Sized>(
    store: &mut SampleStore,
    model: &P,
    requested: NaiveDate,
    steps: usize,
) -> Result<RolloutOutcome> {
    Rollout::new(store, model, requested, steps).run()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::build_windows;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Values 0.0, 0.1, ..., 0.9 on 2020-04-01..10, look-back 3 -> rows 04-04..04-10.
    fn store() -> SampleStore {
        let values: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
        let built = build_windows(&values, 3).unwrap();
        let dates: Vec<NaiveDate> = (4..=10).map(|day| NaiveDate::from_ymd_opt(2020, 4, day).unwrap()).collect();
        SampleStore::build(&dates, built.windows, &built.labels).unwrap()
    }

    fn last_plus(delta: f64) -> impl Fn(&[f64]) -> Result<f64> {
        move |w: &[f64]| Ok(w[w.len() - 1] + delta)
    }

    #[test]
    fn each_prediction_feeds_the_next_window() {
        let mut store = store();
        let outcome = roll_forward(&mut store, &last_plus(1.0), d("2020-04-08"), 3).unwrap();

        // 04-08 window ends at 0.6 -> 1.6, then 2.6, then 3.6.
        assert!((outcome.prediction - 3.6).abs() < 1e-12);
        assert_eq!(outcome.prediction_date, d("2020-04-10"));
        assert_eq!(outcome.starting_date, d("2020-04-07"));
        assert_eq!(outcome.resolved_start, d("2020-04-08"));
        assert!(!outcome.date_adjusted);

        let opened = store.row(d("2020-04-11")).unwrap();
        assert_eq!(opened.label, None);
        let w = &opened.window;
        assert!((w[0] - 1.6).abs() < 1e-12 && (w[1] - 2.6).abs() < 1e-12 && (w[2] - 3.6).abs() < 1e-12);
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn model_sees_exactly_the_shifted_windows() {
        let mut store = store();
        let seen = std::cell::RefCell::new(Vec::new());
        let recorder = |w: &[f64]| -> Result<f64> {
            seen.borrow_mut().push(w.to_vec());
            Ok(9.0)
        };
        roll_forward(&mut store, &recorder, d("2020-04-09"), 3).unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].len(), 3);
        assert!((seen[0][2] - 0.7).abs() < 1e-12);
        assert_eq!(seen[1][2], 9.0);
        assert_eq!(&seen[2][1..], &[9.0, 9.0]);
    }

    #[test]
    fn missing_date_rolls_from_latest() {
        let mut store = store();
        let outcome = roll_forward(&mut store, &last_plus(0.0), d("2019-01-01"), 1).unwrap();

        assert!(outcome.date_adjusted);
        assert_eq!(outcome.resolved_start, d("2020-04-10"));
        assert_eq!(outcome.prediction_date, d("2020-04-10"));
    }

    #[test]
    fn model_failure_aborts_at_the_failing_step() {
        let mut store = store();
        let calls = Cell::new(0);
        let flaky = |w: &[f64]| -> Result<f64> {
            calls.set(calls.get() + 1);
            if calls.get() == 2 {
                Err(ForecastError::ModelInference("boom".to_string()))
            } else {
                Ok(w[0])
            }
        };

        let err = roll_forward(&mut store, &flaky, d("2020-04-05"), 4).unwrap_err();
        assert!(matches!(err, ForecastError::ModelInference(_)));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn non_finite_prediction_is_an_inference_error() {
        let mut store = store();
        let nan = |_: &[f64]| -> Result<f64> { Ok(f64::NAN) };
        assert!(matches!(
            roll_forward(&mut store, &nan, d("2020-04-05"), 1),
            Err(ForecastError::ModelInference(_))
        ));
    }

    #[test]
    fn zero_steps_is_rejected() {
        let mut store = store();
        assert!(matches!(
            roll_forward(&mut store, &last_plus(1.0), d("2020-04-05"), 0),
            Err(ForecastError::InvalidRequest(_))
        ));
    }
}
