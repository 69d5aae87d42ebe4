//! Customer-facing chat texts and confirmation understanding.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use super::text::{contains_phrase, fold, tokens};
use super::Intent;
use crate::domain::scheduling::{weekday_label, Appointment, BusinessCalendar, Service, WorkInterval};

/// How a reply to "can I confirm?" reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirmative,
    Negative,
    Unclear,
}

const AFFIRMATIVE: &[&str] = &[
    "sim", "s", "ok", "okay", "confirmo", "confirma", "confirmar", "confirmado", "pode", "isso",
    "claro", "fechado", "beleza", "perfeito", "certo", "bora", "yes", "y", "sure", "yep",
];

const NEGATIVE: &[&str] = &[
    "nao", "n", "no", "nope", "negativo", "cancelar", "cancela", "errado",
];

impl Confirmation {
    pub fn interpret(text: &str) -> Confirmation {
        let folded = fold(text);
        let toks = tokens(&folded);
        let negative = toks.iter().any(|t| NEGATIVE.contains(t)) || contains_phrase(&toks, "melhor nao");
        let affirmative =
            toks.iter().any(|t| AFFIRMATIVE.contains(t)) || contains_phrase(&toks, "pode ser");

        match (affirmative, negative) {
            (_, true) => Confirmation::Negative,
            (true, false) => Confirmation::Affirmative,
            (false, false) => Confirmation::Unclear,
        }
    }
}

fn hm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn day_label(date: NaiveDate) -> String {
    format!("{} ({})", date.format("%d/%m"), weekday_label(date.weekday()))
}

pub fn greeting() -> &'static str {
    "Olá! Bem-vindo à barbearia. Eu posso agendar seu horário por aqui."
}

pub fn ask_service(services: &[Service]) -> String {
    if services.is_empty() {
        return "Qual serviço você gostaria de agendar?".to_string();
    }
    let names: Vec<&str> = services.iter().map(Service::name).collect();
    format!("Qual serviço você gostaria de agendar? Temos: {}.", names.join(", "))
}

pub fn ask_date() -> String {
    "Para qual dia? Pode dizer \"amanhã\", um dia da semana ou a data (DD/MM).".to_string()
}

/// Lists up to `limit` free starts so the customer can pick one.
pub fn ask_time(date: NaiveDate, free: &[NaiveTime], limit: usize) -> String {
    if free.is_empty() {
        return format!(
            "Não há horários livres em {}. Pode escolher outro dia?",
            day_label(date)
        );
    }
    let shown: Vec<String> = free.iter().take(limit).map(|t| hm(*t)).collect();
    format!(
        "Que horas em {}? Horários livres: {}.",
        day_label(date),
        shown.join(", ")
    )
}

pub fn ask_name() -> String {
    "Qual é o seu nome completo?".to_string()
}

pub fn confirm_prompt(service: &Service, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "Posso confirmar {} ({}, {} min) em {} às {}? Responda sim ou não.",
        service.name(),
        service.format_price(),
        service.duration_minutes(),
        day_label(date),
        hm(time)
    )
}

pub fn slot_taken(requested: NaiveTime, alternative: Option<NaiveTime>) -> String {
    match alternative {
        Some(next) => format!(
            "O horário das {} já está ocupado. O próximo livre é às {}. Quer esse horário? Se preferir, diga outro.",
            hm(requested),
            hm(next)
        ),
        None => format!(
            "O horário das {} já está ocupado e não há outros livres nesse dia. Pode escolher outro dia?",
            hm(requested)
        ),
    }
}

/// The slot was free when offered but got booked before the reply came in.
pub fn slot_lost(requested: NaiveTime) -> String {
    format!(
        "Que pena, o horário das {} acabou de ser reservado.",
        hm(requested)
    )
}

pub fn time_not_offered(requested: NaiveTime, date: NaiveDate, free: &[NaiveTime], limit: usize) -> String {
    format!("Não temos atendimento às {}. {}", hm(requested), ask_time(date, free, limit))
}

pub fn date_unavailable(horizon_months: u32) -> String {
    format!(
        "Essa data não está disponível. Escolha um dia a partir de hoje, em até {} meses.",
        horizon_months
    )
}

pub fn unknown_service(services: &[Service]) -> String {
    format!("Não encontrei esse serviço. {}", ask_service(services))
}

pub fn booked(appointment: &Appointment, calendar: &BusinessCalendar, first_name: &str) -> String {
    let start = appointment.start.as_datetime();
    format!(
        "Pronto, {}! {} agendado para {} às {}. Até lá!",
        first_name,
        appointment.service_name,
        day_label(calendar.local_date(start)),
        hm(calendar.local_time(start))
    )
}

pub fn declined() -> String {
    "Sem problemas. Qual outro horário você prefere?".to_string()
}

pub fn ask_confirmation_again() -> String {
    "Não entendi. Posso confirmar o agendamento? Responda sim ou não.".to_string()
}

pub fn handoff(intent: Intent) -> String {
    let what = match intent {
        Intent::Reschedule => "remarcar",
        _ => "cancelar",
    };
    format!(
        "Para {} um horário, vou chamar um atendente humano. Em instantes alguém da equipe fala com você.",
        what
    )
}

pub fn not_understood() -> String {
    "Desculpe, não entendi. Você quer agendar um horário, ver os serviços ou o horário de funcionamento?".to_string()
}

pub fn service_list(services: &[Service]) -> String {
    if services.is_empty() {
        return "No momento não há serviços cadastrados.".to_string();
    }
    let lines: Vec<String> = services
        .iter()
        .map(|s| format!("• {}: {} ({} min)", s.name(), s.format_price(), s.duration_minutes()))
        .collect();
    format!("Nossos serviços:\n{}", lines.join("\n"))
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Active intervals grouped by weekday, Monday first.
pub fn working_hours(intervals: &[WorkInterval]) -> String {
    let mut lines = Vec::new();
    for weekday in WEEK {
        let mut spans: Vec<&WorkInterval> = intervals
            .iter()
            .filter(|i| i.is_active() && i.weekday() == weekday)
            .collect();
        spans.sort_by_key(|i| i.start());

        let text = if spans.is_empty() {
            "fechado".to_string()
        } else {
            spans
                .iter()
                .map(|i| format!("{}–{}", hm(i.start()), hm(i.end())))
                .collect::<Vec<_>>()
                .join(" e ")
        };
        lines.push(format!("• {}: {}", weekday_label(weekday), text));
    }
    format!("Horário de funcionamento:\n{}", lines.join("\n"))
}

pub fn appointment_list(appointments: &[Appointment], calendar: &BusinessCalendar) -> String {
    if appointments.is_empty() {
        return "Você não tem agendamentos futuros.".to_string();
    }
    let lines: Vec<String> = appointments
        .iter()
        .map(|a| {
            let start = a.start.as_datetime();
            format!(
                "• {} em {} às {}",
                a.service_name,
                day_label(calendar.local_date(start)),
                hm(calendar.local_time(start))
            )
        })
        .collect();
    format!("Seus próximos agendamentos:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn confirmation_table() {
        let cases: &[(&str, Confirmation)] = &[
            ("sim", Confirmation::Affirmative),
            ("Sim, pode confirmar!", Confirmation::Affirmative),
            ("ok", Confirmation::Affirmative),
            ("confirmo", Confirmation::Affirmative),
            ("yes", Confirmation::Affirmative),
            ("pode ser", Confirmation::Affirmative),
            ("não", Confirmation::Negative),
            ("no", Confirmation::Negative),
            ("cancelar", Confirmation::Negative),
            ("sim... na verdade não", Confirmation::Negative),
            ("hmm, talvez", Confirmation::Unclear),
        ];
        for (input, expected) in cases {
            assert_eq!(Confirmation::interpret(input), *expected, "input: {input}");
        }
    }

    #[test]
    fn ask_time_lists_limited_slots() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let text = ask_time(date, &[t(9, 0), t(9, 15), t(9, 30)], 2);
        assert!(text.contains("09:00, 09:15"));
        assert!(!text.contains("09:30"));
        assert!(text.contains("quarta-feira"));
    }

    #[test]
    fn slot_taken_offers_alternative() {
        let text = slot_taken(t(10, 15), Some(t(10, 30)));
        assert!(text.contains("10:15") && text.contains("10:30"));
    }

    #[test]
    fn time_not_offered_suggests_free_slots() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let text = time_not_offered(t(19, 0), date, &[t(17, 0), t(17, 30)], 5);
        assert!(text.starts_with("Não temos atendimento às 19:00."));
        assert!(text.contains("17:00, 17:30"));
    }

    #[test]
    fn service_list_shows_price_and_duration() {
        let services = vec![Service::new("Corte", 3500, 30).unwrap()];
        let text = service_list(&services);
        assert!(text.contains("Corte: R$ 35,00 (30 min)"));
    }

    #[test]
    fn working_hours_marks_closed_days() {
        let intervals = vec![
            WorkInterval::new(Weekday::Mon, t(14, 0), t(18, 0), true).unwrap(),
            WorkInterval::new(Weekday::Mon, t(9, 0), t(12, 0), true).unwrap(),
            WorkInterval::new(Weekday::Tue, t(9, 0), t(12, 0), false).unwrap(),
        ];
        let text = working_hours(&intervals);
        assert!(text.contains("segunda-feira: 09:00–12:00 e 14:00–18:00"));
        assert!(text.contains("terça-feira: fechado"));
        assert!(text.contains("domingo: fechado"));
    }

    #[test]
    fn handoff_never_claims_completion() {
        let text = handoff(Intent::Cancel);
        assert!(text.contains("atendente"));
        assert!(!text.contains("cancelado"));
    }
}
