//! DialogueManager - drives a booking conversation one inbound message at a time.
//!
//! Each message runs, under the sender's lock:
//! 1. Confirmation handling when a yes/no answer is outstanding
//! 2. Intent classification (free text) or schema validation (agent action)
//! 3. Handoff or one-shot answers, which leave the context untouched
//! 4. Entity extraction and merge into the conversation store
//! 5. A targeted question for the first missing field, or slot verification

use chrono::Months;
use std::sync::Arc;

use crate::application::conversation_locks::ConversationLocks;
use crate::application::handlers::booking::{
    CreateBookingCommand, CreateBookingHandler, ListClientAppointmentsHandler,
    ListClientAppointmentsQuery, Scheduler, DEFAULT_HORIZON_MONTHS,
};
use crate::application::handlers::client::{RegisterClientCommand, RegisterClientHandler};
use crate::domain::conversation::{
    replies, AgentAction, BookingFields, Confirmation, ConversationContext, DialogueState,
    EntityExtractor, Intent,
};
use crate::domain::foundation::{AccountId, PhoneNumber};
use crate::domain::scheduling::{Appointment, BookingError, DaySchedule, NotFoundKind, Service};
use crate::ports::{ClientDirectory, ConversationStore};

/// How many free starts a time question lists.
pub const DEFAULT_SLOT_HINTS: usize = 6;

/// Inbound message content.
#[derive(Debug, Clone)]
pub enum ChatInput {
    /// Free text typed by the customer.
    Text(String),
    /// Raw JSON action produced by an assistant model.
    Action(String),
}

#[derive(Debug, Clone)]
pub struct HandleChatMessageCommand {
    pub phone: PhoneNumber,
    pub input: ChatInput,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    /// `None` when the message could not be understood.
    pub intent: Option<Intent>,
    /// Dialogue state after this message, if a conversation is open.
    pub state: Option<DialogueState>,
    /// Set when this message committed a booking.
    pub appointment: Option<Appointment>,
}

/// Outcome of one booking-dialogue step.
struct Turn {
    reply: String,
    state: DialogueState,
    appointment: Option<Appointment>,
}

impl Turn {
    fn ask(ctx: &ConversationContext, reply: String) -> Self {
        Self {
            reply,
            state: ctx.state,
            appointment: None,
        }
    }
}

pub struct DialogueManager {
    scheduler: Scheduler,
    conversations: Arc<dyn ConversationStore>,
    clients: Arc<dyn ClientDirectory>,
    booking: CreateBookingHandler,
    registration: RegisterClientHandler,
    listing: ListClientAppointmentsHandler,
    locks: ConversationLocks,
    horizon_months: u32,
    slot_hints: usize,
}

impl DialogueManager {
    pub fn new(
        scheduler: Scheduler,
        conversations: Arc<dyn ConversationStore>,
        clients: Arc<dyn ClientDirectory>,
        account_id: AccountId,
        locks: ConversationLocks,
    ) -> Self {
        let clock = scheduler.clock();
        Self {
            booking: CreateBookingHandler::new(scheduler.clone(), clients.clone()),
            registration: RegisterClientHandler::new(clients.clone(), clock, account_id),
            listing: ListClientAppointmentsHandler::new(scheduler.clone(), clients.clone()),
            scheduler,
            conversations,
            clients,
            locks,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            slot_hints: DEFAULT_SLOT_HINTS,
        }
    }

    pub fn with_horizon_months(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self.booking = self.booking.with_horizon_months(months);
        self
    }

    pub fn with_slot_hints(mut self, hints: usize) -> Self {
        self.slot_hints = hints.max(1);
        self
    }

    /// Handles one message. Failures become apologetic replies; nothing
    /// infrastructure-related reaches the customer.
    pub async fn handle(&self, cmd: HandleChatMessageCommand) -> ChatReply {
        let _guard = self.locks.acquire(&cmd.phone).await;

        let greet = match self.conversations.mark_greeted(&cmd.phone).await {
            Ok(first) => first,
            Err(err) => {
                tracing::warn!(phone = %cmd.phone, error = %err, "Greeting marker unavailable");
                false
            }
        };

        let mut reply = self.respond(&cmd.phone, cmd.input).await;
        if greet {
            reply.reply = format!("{}\n\n{}", replies::greeting(), reply.reply);
        }

        tracing::debug!(
            phone = %cmd.phone,
            intent = ?reply.intent,
            state = ?reply.state,
            booked = reply.appointment.is_some(),
            "Chat message handled"
        );
        reply
    }

    async fn respond(&self, phone: &PhoneNumber, input: ChatInput) -> ChatReply {
        let current = match self.conversations.get(phone).await {
            Ok(ctx) => ctx.filter(|c| c.state != DialogueState::Done),
            Err(err) => return failure(None, None, err.into()),
        };
        let open_state = current.as_ref().map(|c| c.state);

        let (intent, text) = match &input {
            ChatInput::Text(text) => {
                if let Some(ctx) = current.as_ref().filter(|c| c.state.awaits_confirmation()) {
                    // New details outrank a yes; they go back through verification
                    if Intent::classify(text) == Intent::Book {
                        let changes = match self.extract(text, Some(ctx)).await {
                            Ok(fields) => changed_fields(&ctx.fields, fields),
                            Err(err) => return failure(Some(Intent::Book), open_state, err),
                        };
                        if !changes.is_empty() {
                            let turn = self.book(phone, current.clone(), changes, Some(text)).await;
                            return self.finish(Intent::Book, open_state, turn);
                        }
                    }
                    match Confirmation::interpret(text) {
                        Confirmation::Affirmative => {
                            return self.finish(Intent::Book, open_state, self.commit(ctx.clone()).await);
                        }
                        Confirmation::Negative => {
                            return self.finish(Intent::Book, open_state, self.decline(ctx.clone()).await);
                        }
                        Confirmation::Unclear => {}
                    }
                }
                (Intent::classify(text), Some(text.as_str()))
            }
            ChatInput::Action(payload) => match AgentAction::parse(payload) {
                Ok(action) if action.intent == Intent::Book => {
                    let turn = self.book(phone, current, action.fields, None).await;
                    return self.finish(Intent::Book, open_state, turn);
                }
                Ok(action) => (action.intent, None),
                Err(_) => {
                    return ChatReply {
                        reply: replies::not_understood(),
                        intent: None,
                        state: open_state,
                        appointment: None,
                    };
                }
            },
        };

        if intent.requires_handoff() {
            tracing::info!(phone = %phone, intent = intent.as_str(), "Escalating to human operator");
            return ChatReply {
                reply: replies::handoff(intent),
                intent: Some(intent),
                state: open_state,
                appointment: None,
            };
        }

        if intent.is_one_shot() {
            return match self.answer(phone, intent).await {
                Ok(reply) => ChatReply {
                    reply,
                    intent: Some(intent),
                    state: open_state,
                    appointment: None,
                },
                Err(err) => failure(Some(intent), open_state, err),
            };
        }

        let text = text.unwrap_or_default();
        let extracted = self.extract(text, current.as_ref()).await;
        let turn = match extracted {
            Ok(fields) => self.book(phone, current, fields, Some(text)).await,
            Err(err) => Err(err),
        };
        self.finish(intent, open_state, turn)
    }

    fn finish(
        &self,
        intent: Intent,
        open_state: Option<DialogueState>,
        turn: Result<Turn, BookingError>,
    ) -> ChatReply {
        match turn {
            Ok(turn) => ChatReply {
                reply: turn.reply,
                intent: Some(intent),
                state: Some(turn.state),
                appointment: turn.appointment,
            },
            Err(err) => failure(Some(intent), open_state, err),
        }
    }

    async fn answer(&self, phone: &PhoneNumber, intent: Intent) -> Result<String, BookingError> {
        match intent {
            Intent::ListServices => Ok(replies::service_list(&self.scheduler.list_services().await?)),
            Intent::ListWorkingHours => Ok(replies::working_hours(
                &self.scheduler.list_work_intervals().await?,
            )),
            _ => {
                let query = ListClientAppointmentsQuery {
                    phone: phone.clone(),
                };
                let appointments = match self.listing.handle(query).await {
                    Ok(found) => found.appointments,
                    Err(BookingError::NotFound(NotFoundKind::Client(_))) => Vec::new(),
                    Err(err) => return Err(err),
                };
                Ok(replies::appointment_list(&appointments, self.scheduler.calendar()))
            }
        }
    }

    async fn extract(&self, text: &str, ctx: Option<&ConversationContext>) -> Result<BookingFields, BookingError> {
        let services = self.scheduler.list_services().await?;
        let extractor = EntityExtractor::new(services.iter().map(|s| s.name().to_string()));
        let today = self.scheduler.today();

        let expecting_name = ctx.is_some_and(|c| c.state == DialogueState::CollectName);
        Ok(if expecting_name {
            extractor.extract_expecting_name(text, today)
        } else {
            extractor.extract(text, today)
        })
    }

    /// Merges new fields and moves the booking dialogue forward.
    async fn book(
        &self,
        phone: &PhoneNumber,
        current: Option<ConversationContext>,
        mut fields: BookingFields,
        text: Option<&str>,
    ) -> Result<Turn, BookingError> {
        if let Some(ctx) = &current {
            if ctx.state.awaits_confirmation() && fields.is_empty() {
                return Ok(Turn::ask(ctx, replies::ask_confirmation_again()));
            }
            // "Sim" after a suggested alternative accepts it
            if ctx.state == DialogueState::CollectTime && fields.time.is_none() {
                if let (Some(suggested), Some(text)) = (ctx.suggested_time, text) {
                    if Confirmation::interpret(text) == Confirmation::Affirmative {
                        fields.time = Some(suggested);
                    }
                }
            }
        }

        let new_time = fields.time.is_some();
        let mut ctx = self.conversations.merge(phone, fields).await?;
        if ctx.state == DialogueState::Done {
            ctx = ConversationContext::new(phone.clone(), self.scheduler.now());
        }
        if new_time {
            ctx.suggested_time = None;
        }
        if ctx.state.awaits_confirmation() {
            // New details while a yes/no was pending; verify again
            move_to(&mut ctx, DialogueState::VerifySlot)?;
        }

        self.progress(ctx).await
    }

    /// Asks for the first missing field or verifies the complete request.
    async fn progress(&self, mut ctx: ConversationContext) -> Result<Turn, BookingError> {
        let services = self.scheduler.list_services().await?;

        let service = match ctx.fields.service.clone() {
            Some(name) => match self.scheduler.resolve_service(&name).await {
                Ok(service) => {
                    ctx.fields.service = Some(service.name().to_string());
                    Some(service)
                }
                Err(BookingError::NotFound(NotFoundKind::Service(_))) => {
                    ctx.fields.service = None;
                    move_to(&mut ctx, DialogueState::CollectService)?;
                    return self.save(ctx, replies::unknown_service(&services)).await;
                }
                Err(err) => return Err(err),
            },
            None => None,
        };

        if let Some(date) = ctx.fields.date {
            if !self.within_horizon(date) {
                ctx.fields.date = None;
                ctx.suggested_time = None;
                move_to(&mut ctx, DialogueState::CollectDate)?;
                return self.save(ctx, replies::date_unavailable(self.horizon_months)).await;
            }
        }

        let needs_name = self.clients.find_by_phone(&ctx.phone).await?.is_none();

        match (ctx.fields.first_missing(needs_name), service) {
            (Some(DialogueState::CollectService), _) | (_, None) => {
                move_to(&mut ctx, DialogueState::CollectService)?;
                self.save(ctx, replies::ask_service(&services)).await
            }
            (Some(DialogueState::CollectDate), _) => {
                move_to(&mut ctx, DialogueState::CollectDate)?;
                self.save(ctx, replies::ask_date()).await
            }
            (Some(DialogueState::CollectTime), Some(service)) => self.ask_time(ctx, &service).await,
            (Some(state), _) => {
                move_to(&mut ctx, state)?;
                self.save(ctx, replies::ask_name()).await
            }
            (None, Some(service)) => self.verify(ctx, &service).await,
        }
    }

    async fn ask_time(&self, mut ctx: ConversationContext, service: &Service) -> Result<Turn, BookingError> {
        let Some(date) = ctx.fields.date else {
            move_to(&mut ctx, DialogueState::CollectDate)?;
            return self.save(ctx, replies::ask_date()).await;
        };

        let plan = self.scheduler.day_plan(service, date).await?;
        if let DaySchedule::Closed { weekday } = plan.schedule {
            ctx.fields.date = None;
            move_to(&mut ctx, DialogueState::CollectDate)?;
            let reply = BookingError::Closed { date, weekday }.user_message();
            return self.save(ctx, reply).await;
        }

        let free = plan.free_slots(self.scheduler.calendar());
        move_to(&mut ctx, DialogueState::CollectTime)?;
        self.save(ctx, replies::ask_time(date, &free, self.slot_hints)).await
    }

    /// Checks the requested slot; a free one is offered for confirmation.
    async fn verify(&self, mut ctx: ConversationContext, service: &Service) -> Result<Turn, BookingError> {
        let (Some(date), Some(time)) = (ctx.fields.date, ctx.fields.time) else {
            return self.ask_time(ctx, service).await;
        };
        move_to(&mut ctx, DialogueState::VerifySlot)?;

        let calendar = self.scheduler.calendar();
        let plan = self.scheduler.day_plan(service, date).await?;
        if let DaySchedule::Closed { weekday } = plan.schedule {
            ctx.fields.date = None;
            ctx.fields.time = None;
            move_to(&mut ctx, DialogueState::CollectDate)?;
            let reply = BookingError::Closed { date, weekday }.user_message();
            return self.save(ctx, reply).await;
        }

        if plan.resolver(calendar).has_conflict(time) {
            let alternative = plan.next_available(calendar, time);
            ctx.fields.time = None;
            ctx.suggested_time = alternative;
            move_to(&mut ctx, DialogueState::CollectTime)?;
            return self.save(ctx, replies::slot_taken(time, alternative)).await;
        }

        if !plan.schedule.offers(time) {
            let free = plan.free_slots(calendar);
            ctx.fields.time = None;
            ctx.suggested_time = plan.next_available(calendar, time);
            move_to(&mut ctx, DialogueState::CollectTime)?;
            let reply = replies::time_not_offered(time, date, &free, self.slot_hints);
            return self.save(ctx, reply).await;
        }

        move_to(&mut ctx, DialogueState::Confirm)?;
        self.save(ctx, replies::confirm_prompt(service, date, time)).await
    }

    /// Commits the confirmed booking, registering the client first if new.
    async fn commit(&self, mut ctx: ConversationContext) -> Result<Turn, BookingError> {
        let (Some(service), Some(date), Some(time)) =
            (ctx.fields.service.clone(), ctx.fields.date, ctx.fields.time)
        else {
            move_to(&mut ctx, DialogueState::VerifySlot)?;
            return self.progress(ctx).await;
        };

        if self.clients.find_by_phone(&ctx.phone).await?.is_none() {
            let Some(name) = ctx.fields.name.clone() else {
                move_to(&mut ctx, DialogueState::VerifySlot)?;
                return self.progress(ctx).await;
            };
            self.registration
                .handle(RegisterClientCommand {
                    name,
                    phone: ctx.phone.clone(),
                })
                .await?;
        }

        let cmd = CreateBookingCommand {
            phone: ctx.phone.clone(),
            service,
            date,
            time,
        };

        match self.booking.handle(cmd).await {
            Ok(result) => {
                move_to(&mut ctx, DialogueState::Done)?;
                if let Err(err) = self.conversations.delete(&ctx.phone).await {
                    tracing::warn!(phone = %ctx.phone, error = %err, "Failed to clear finished conversation");
                }
                Ok(Turn {
                    reply: result.confirmation_message,
                    state: DialogueState::Done,
                    appointment: Some(result.appointment),
                })
            }
            Err(BookingError::Conflict {
                requested,
                next_available,
            }) => {
                // Lost the race: verify the alternative, or ask for another time
                move_to(&mut ctx, DialogueState::VerifySlot)?;
                ctx.fields.time = next_available;
                let turn = match next_available {
                    Some(_) => self.progress(ctx).await?,
                    None => {
                        ctx.suggested_time = None;
                        move_to(&mut ctx, DialogueState::CollectTime)?;
                        self.save(ctx, replies::slot_taken(requested, None)).await?
                    }
                };
                Ok(Turn {
                    reply: format!("{} {}", replies::slot_lost(requested), turn.reply),
                    ..turn
                })
            }
            Err(err @ (BookingError::Closed { .. } | BookingError::Validation { .. })) => {
                match &err {
                    BookingError::Validation { field, .. } if field == "time" => ctx.fields.time = None,
                    _ => {
                        ctx.fields.date = None;
                        ctx.fields.time = None;
                    }
                }
                move_to(&mut ctx, DialogueState::VerifySlot)?;
                let turn = self.progress(ctx).await?;
                Ok(Turn {
                    reply: format!("{} {}", err.user_message(), turn.reply),
                    ..turn
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn decline(&self, mut ctx: ConversationContext) -> Result<Turn, BookingError> {
        ctx.fields.time = None;
        ctx.suggested_time = None;
        move_to(&mut ctx, DialogueState::CollectTime)?;
        self.save(ctx, replies::declined()).await
    }

    async fn save(&self, ctx: ConversationContext, reply: String) -> Result<Turn, BookingError> {
        self.conversations.save(&ctx).await?;
        Ok(Turn::ask(&ctx, reply))
    }

    fn within_horizon(&self, date: chrono::NaiveDate) -> bool {
        let today = self.scheduler.today();
        let horizon = today
            .checked_add_months(Months::new(self.horizon_months))
            .unwrap_or(today);
        date >= today && date <= horizon
    }
}

fn move_to(ctx: &mut ConversationContext, target: DialogueState) -> Result<(), BookingError> {
    if ctx.state != target {
        ctx.advance(target)?;
    }
    Ok(())
}

/// Keeps only the fields of `incoming` that differ from `current`.
fn changed_fields(current: &BookingFields, incoming: BookingFields) -> BookingFields {
    let same_service = |service: &String| {
        current
            .service
            .as_deref()
            .is_some_and(|known| known.eq_ignore_ascii_case(service))
    };
    BookingFields {
        service: incoming.service.filter(|s| !same_service(s)),
        date: incoming.date.filter(|d| current.date != Some(*d)),
        time: incoming.time.filter(|t| current.time != Some(*t)),
        name: incoming.name.filter(|n| current.name.as_deref() != Some(n.as_str())),
    }
}

fn failure(intent: Option<Intent>, state: Option<DialogueState>, err: BookingError) -> ChatReply {
    if let BookingError::Transient(detail) = &err {
        tracing::error!(error = %detail, "Chat turn failed");
    }
    ChatReply {
        reply: err.user_message(),
        intent,
        state,
        appointment: None,
    }
}
