//! Click-to-book negotiation state machine.
//!
//! One machine lives per slot click: `Idle → AwaitingProposal → Proposed →
//! Submitted`, with the immediate-book path skipping `Proposed`. Transitions
//! consume typed inputs and emit [`Effect`]s; the machine never touches a
//! rendering surface or a transport. An adapter binds UI events to
//! transitions and executes the effects.
//!
//! There is deliberately no interlock across machines: a second click while
//! a proposal is in flight spins up a second machine, matching the backend's
//! tolerance for overlapping proposals. Submission failures surface only as
//! the unresolved backend call; the machine defines no retry.

use chrono::Datelike;
use chrono::NaiveDate;

use crate::core::config::CalendarConfig;
use crate::core::errors::{GridError, Result};
use crate::booking::protocol::{
    BookingBackend, ProposalData, ProposalRequest, ProposalResponse, SubmissionRequest,
};
use crate::feed::model::Mark;
use crate::grid::render::weekday_kanji;

/// A click on a rendered cell, as handed over by the view adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotClick {
    /// The cell's mark after eligibility rewriting.
    pub mark: Mark,
    /// Hidden system date carried by the cell.
    pub system_date: NaiveDate,
    /// Time label of the clicked row.
    pub row_time_label: String,
    /// Start-time annotation, present only on girl calendars.
    pub start_time: Option<String>,
}

/// The selection derived from a click, held until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub girl_id: String,
    /// `YYYY-MM-DD(曜)`.
    pub day: String,
    /// Row label or start-time annotation, `～` normalized to `-`.
    pub day_time: String,
    pub waitlist: bool,
    /// Post-submission navigation target.
    pub destination: String,
}

/// Texts for the two negotiation-surface buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    /// "Change to the proposed time" button label.
    pub change_label: String,
    /// "Keep the original time" button label.
    pub keep_label: String,
}

/// Side effects an adapter must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the asynchronous proposal request.
    SendProposal(ProposalRequest),
    /// Open the negotiation surface with these texts.
    OpenModal(ModalContent),
    /// Close the negotiation surface. Closing cancels nothing in flight.
    CloseModal,
    /// Submit the final selection.
    Submit(SubmissionRequest),
    /// Navigate to the confirmation or waitlist page.
    Navigate(String),
}

/// Observable machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Phase {
    Idle,
    AwaitingProposal,
    Proposed,
    Submitted,
}

#[derive(Debug)]
enum State {
    Idle,
    AwaitingProposal(Selection),
    Proposed {
        original: Selection,
        proposal: ProposalData,
    },
    Submitted,
}

impl State {
    const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingProposal(_) => "awaiting_proposal",
            Self::Proposed { .. } => "proposed",
            Self::Submitted => "submitted",
        }
    }
}

/// The per-click negotiation machine.
#[derive(Debug)]
pub struct Negotiator {
    girl_id: String,
    girl_view: bool,
    confirm_url: String,
    waitlist_url: String,
    state: State,
}

impl Negotiator {
    /// Fresh machine in `Idle`, bound to the view and endpoint config.
    #[must_use]
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            girl_id: config.view.girl_id.clone(),
            girl_view: config.is_girl_view(),
            confirm_url: config.endpoints.confirm_url.clone(),
            waitlist_url: config.endpoints.waitlist_url.clone(),
            state: State::Idle,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::AwaitingProposal(_) => Phase::AwaitingProposal,
            State::Proposed { .. } => Phase::Proposed,
            State::Submitted => Phase::Submitted,
        }
    }

    /// Handle a cell click. Non-actionable marks are ignored; actionable
    /// ones derive the selection and request a proposal.
    pub fn click(&mut self, click: &SlotClick) -> Result<Vec<Effect>> {
        if !matches!(self.state, State::Idle) {
            return Err(GridError::InvalidTransition {
                state: self.state.name(),
                input: "click",
            });
        }
        if !click.mark.is_actionable() {
            return Ok(Vec::new());
        }

        let day = format!(
            "{}({})",
            click.system_date.format("%Y-%m-%d"),
            weekday_kanji(click.system_date.weekday())
        );
        // Girl calendars book the annotated start time when present.
        let time_source = match (&self.girl_view, &click.start_time) {
            (true, Some(start)) if !start.is_empty() => start.clone(),
            _ => click.row_time_label.clone(),
        };
        let day_time = time_source.replace('～', "-");

        let waitlist = click.mark == Mark::Waitlist;
        let destination = if waitlist {
            self.waitlist_url.clone()
        } else {
            self.confirm_url.clone()
        };

        let request = ProposalRequest {
            girl_id: self.girl_id.clone(),
            day: day.clone(),
            day_time: day_time.clone(),
        };
        self.state = State::AwaitingProposal(Selection {
            girl_id: self.girl_id.clone(),
            day,
            day_time,
            waitlist,
            destination,
        });
        Ok(vec![Effect::SendProposal(request)])
    }

    /// Feed the server's answer to the proposal request.
    ///
    /// `result=false` books the original selection immediately;
    /// `result=true` opens the negotiation surface.
    pub fn proposal_response(&mut self, response: ProposalResponse) -> Result<Vec<Effect>> {
        let State::AwaitingProposal(selection) = &self.state else {
            return Err(GridError::InvalidTransition {
                state: self.state.name(),
                input: "proposal_response",
            });
        };
        let selection = selection.clone();

        if !response.result {
            let submission = SubmissionRequest::plain(
                selection.girl_id.clone(),
                selection.day.clone(),
                selection.day_time.clone(),
                selection.waitlist,
            );
            self.state = State::Submitted;
            return Ok(vec![
                Effect::Submit(submission),
                Effect::Navigate(selection.destination),
            ]);
        }

        let proposal = response.result_data.ok_or(GridError::MissingProposalData)?;

        let mut change_label = format!("{} に変更する", proposal.disp_proposal_day_time);
        if let Some(message) = &proposal.proposal_message {
            change_label.push_str(&format!("\n({message})"));
        }
        let keep_label = format!(
            "変更せず\n{} のまま予約を進める",
            proposal.disp_selected_day_time
        );

        self.state = State::Proposed {
            original: selection,
            proposal,
        };
        Ok(vec![Effect::OpenModal(ModalContent {
            change_label,
            keep_label,
        })])
    }

    /// User took the proposed time. Submits the proposal with the original
    /// selection preserved in the backup audit fields.
    pub fn accept(&mut self) -> Result<Vec<Effect>> {
        let State::Proposed { original, proposal } = &self.state else {
            return Err(GridError::InvalidTransition {
                state: self.state.name(),
                input: "accept",
            });
        };

        let submission = SubmissionRequest {
            girl_id: original.girl_id.clone(),
            day: format!("{}({})", proposal.proposal_day, proposal.proposal_day_of_week),
            day_time: proposal.proposal_day_time.clone(),
            waitlist_notification: false,
            backup_day: Some(original.day.clone()),
            backup_day_time: Some(original.day_time.clone()),
            backup_day_of_week: Some(proposal.selected_day_of_week.clone()),
        };
        let destination = original.destination.clone();
        self.state = State::Submitted;
        Ok(vec![
            Effect::Submit(submission),
            Effect::CloseModal,
            Effect::Navigate(destination),
        ])
    }

    /// User kept the originally clicked time.
    pub fn decline(&mut self) -> Result<Vec<Effect>> {
        let State::Proposed { original, .. } = &self.state else {
            return Err(GridError::InvalidTransition {
                state: self.state.name(),
                input: "decline",
            });
        };

        let submission = SubmissionRequest::plain(
            original.girl_id.clone(),
            original.day.clone(),
            original.day_time.clone(),
            false,
        );
        let destination = original.destination.clone();
        self.state = State::Submitted;
        Ok(vec![
            Effect::Submit(submission),
            Effect::CloseModal,
            Effect::Navigate(destination),
        ])
    }
}

/// Decision taken on the negotiation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Use the proposed time.
    Accept,
    /// Keep the originally clicked time.
    Decline,
}

/// What a completed booking run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    /// The submission that was sent.
    pub submitted: SubmissionRequest,
    /// Where the user ends up afterwards.
    pub destination: String,
}

/// Synchronous driver binding one machine run to a [`BookingBackend`].
///
/// `decide` is only consulted when the server actually proposes a change.
/// Returns `None` for clicks on non-actionable marks.
pub fn run_booking<B: BookingBackend>(
    config: &CalendarConfig,
    backend: &mut B,
    click: &SlotClick,
    decide: impl FnOnce(&ModalContent) -> Decision,
) -> Result<Option<BookingOutcome>> {
    let mut machine = Negotiator::new(config);

    let effects = machine.click(click)?;
    let Some(Effect::SendProposal(request)) = effects.first() else {
        return Ok(None);
    };
    let response = backend.propose(request)?;

    let mut effects = machine.proposal_response(response)?;
    let modal = match effects.first() {
        Some(Effect::OpenModal(modal)) => Some(modal.clone()),
        _ => None,
    };
    if let Some(modal) = modal {
        effects = match decide(&modal) {
            Decision::Accept => machine.accept()?,
            Decision::Decline => machine.decline()?,
        };
    }

    let mut submitted = None;
    let mut destination = None;
    for effect in effects {
        match effect {
            Effect::Submit(request) => {
                backend.submit(&request)?;
                submitted = Some(request);
            }
            Effect::Navigate(url) => destination = Some(url),
            Effect::OpenModal(_) | Effect::CloseModal | Effect::SendProposal(_) => {}
        }
    }

    match (submitted, destination) {
        (Some(submitted), Some(destination)) => Ok(Some(BookingOutcome {
            submitted,
            destination,
        })),
        _ => Err(GridError::InvalidTransition {
            state: "submitted",
            input: "missing submission effects",
        }),
    }
}
