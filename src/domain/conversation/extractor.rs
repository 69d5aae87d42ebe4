//! Heuristic entity extraction from free-text booking messages.
//!
//! Extraction never fails: anything ambiguous is left out so the dialogue
//! asks for it instead of acting on a guess.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::text::{char_offset, contains_phrase, fold, tokens};
use super::BookingFields;

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b").expect("numeric date pattern")
});

static DAY_OF_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdia\s+(\d{1,2})\b").expect("day of month pattern"));

static AM_PM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("am/pm pattern")
});

static CLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2})|\.(\d{2})|h(\d{2})?\b)").expect("clock pattern")
});

static AT_HOUR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:as|at|pras|umas|por volta das)\s+(\d{1,2})\b").expect("at-hour pattern")
});

static HOUR_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s*(?:horas?\b|hrs?\b|(?:da|de)\s+(?:manha|tarde|noite)\b)")
        .expect("hour suffix pattern")
});

/// Keyword categories resolved against catalog names by substring.
const SERVICE_KEYWORDS: &[(&str, &[&str])] = &[
    ("corte", &["corte", "cortar", "cabelo", "haircut", "cut"]),
    ("barba", &["barba", "barbear", "beard", "shave"]),
    ("sobrancelha", &["sobrancelha", "sobrancelhas", "eyebrow", "eyebrows"]),
    ("combo", &["combo"]),
];

const WEEKDAY_WORDS: &[(&str, Weekday)] = &[
    ("segunda", Weekday::Mon),
    ("terca", Weekday::Tue),
    ("quarta", Weekday::Wed),
    ("quinta", Weekday::Thu),
    ("sexta", Weekday::Fri),
    ("sabado", Weekday::Sat),
    ("domingo", Weekday::Sun),
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

const HOUR_WORDS: &[(&str, u32)] = &[
    ("uma", 1),
    ("duas", 2),
    ("tres", 3),
    ("quatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("sete", 7),
    ("oito", 8),
    ("nove", 9),
    ("dez", 10),
    ("onze", 11),
    ("doze", 12),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
];

/// Longest first so "eu sou o" wins over "eu sou". Loose triggers
/// ("eu sou", "i'm") also start ordinary sentences.
const NAME_TRIGGERS: &[(&str, Trigger)] = &[
    ("meu nome e", Trigger::Explicit),
    ("my name is", Trigger::Explicit),
    ("eu me chamo", Trigger::Explicit),
    ("me chamo", Trigger::Explicit),
    ("eu sou o", Trigger::Loose),
    ("eu sou a", Trigger::Loose),
    ("eu sou", Trigger::Loose),
    ("sou o", Trigger::Loose),
    ("sou a", Trigger::Loose),
    ("i am", Trigger::Loose),
    ("i'm", Trigger::Loose),
    ("i’m", Trigger::Loose),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Explicit,
    Loose,
}

/// Words after a loose trigger that show the sentence is not a name.
const NOT_NAME_WORDS: &[&str] = &[
    "novo", "nova", "cliente", "aqui", "um", "uma", "o", "a", "os", "em", "com", "que", "muito",
    "so", "ja", "looking", "for", "an", "the", "new", "here", "just", "going", "trying",
    "interested", "in", "not", "sure", "available", "free", "customer", "client", "back",
    "again", "horario", "agendamento", "marcar", "agendar",
];

/// Words that end a name captured after a trigger phrase.
const NAME_STOP_WORDS: &[&str] = &[
    "e", "quero", "queria", "gostaria", "preciso", "para", "pra", "and", "i", "want", "would",
    "need", "to", "amanha", "hoje", "as", "tomorrow", "today", "at",
];

/// Words that never form a bare name on their own.
const CHAT_VOCABULARY: &[&str] = &[
    "sim", "nao", "ok", "oi", "ola", "obrigado", "obrigada", "quero", "bom", "boa", "dia", "tarde",
    "noite", "manha", "yes", "no", "hello", "hi", "thanks", "please", "por", "favor",
];

/// Lowercase particles kept lowercase inside a title-cased name.
const NAME_PARTICLES: &[&str] = &["da", "de", "do", "das", "dos", "e"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Period {
    fn default_time(self) -> Option<NaiveTime> {
        match self {
            Period::Morning => NaiveTime::from_hms_opt(9, 0, 0),
            Period::Afternoon => NaiveTime::from_hms_opt(14, 0, 0),
            Period::Evening => NaiveTime::from_hms_opt(18, 0, 0),
        }
    }
}

#[derive(Debug, Clone)]
struct CatalogName {
    name: String,
    folded: String,
}

/// Parses booking fields out of chat text against a service catalog.
#[derive(Debug, Clone, Default)]
pub struct EntityExtractor {
    services: Vec<CatalogName>,
}

impl EntityExtractor {
    pub fn new<I, S>(service_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let services = service_names
            .into_iter()
            .map(Into::<String>::into)
            .filter(|name| !name.trim().is_empty())
            .map(|name| CatalogName {
                folded: fold(name.trim()),
                name,
            })
            .collect();
        Self { services }
    }

    /// Extracts fields; names only after an explicit trigger phrase.
    pub fn extract(&self, text: &str, today: NaiveDate) -> BookingFields {
        self.extract_with(text, today, false)
    }

    /// Same as [`extract`](Self::extract) but also accepts a bare name,
    /// for replies to a "what is your name" question.
    pub fn extract_expecting_name(&self, text: &str, today: NaiveDate) -> BookingFields {
        self.extract_with(text, today, true)
    }

    fn extract_with(&self, text: &str, today: NaiveDate, expecting_name: bool) -> BookingFields {
        let folded = fold(text);
        let toks = tokens(&folded);

        let mut fields = BookingFields {
            service: self.extract_service(&folded, &toks),
            date: extract_date(&folded, &toks, today),
            time: extract_time(&folded, &toks),
            name: extract_triggered_name(text, &folded),
        };

        if fields.name.is_none()
            && expecting_name
            && fields.service.is_none()
            && fields.date.is_none()
            && fields.time.is_none()
        {
            fields.name = extract_bare_name(text);
        }

        fields
    }

    fn extract_service(&self, folded: &str, toks: &[&str]) -> Option<String> {
        let direct = self
            .services
            .iter()
            .filter(|s| contains_at_boundary(folded, &s.folded))
            .max_by_key(|s| s.folded.chars().count());
        if let Some(service) = direct {
            return Some(service.name.clone());
        }

        let categories: Vec<&str> = SERVICE_KEYWORDS
            .iter()
            .filter(|(_, words)| words.iter().any(|w| toks.contains(w)))
            .map(|(category, _)| *category)
            .collect();
        if categories.is_empty() {
            return None;
        }

        let candidates: Vec<&CatalogName> = self
            .services
            .iter()
            .filter(|s| categories.iter().all(|c| s.folded.contains(c)))
            .collect();

        match candidates.as_slice() {
            [] => None,
            [only] => Some(only.name.clone()),
            many => {
                // Several entries share the category; only the bare one is unambiguous
                if categories.len() != 1 {
                    return None;
                }
                many.iter()
                    .find(|s| s.folded == categories[0])
                    .map(|s| s.name.clone())
            }
        }
    }
}

fn contains_at_boundary(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn booking_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = today - Duration::days(1);
    let latest = today.checked_add_months(Months::new(3)).unwrap_or(today);
    (earliest, latest)
}

fn within_window(date: NaiveDate, today: NaiveDate) -> bool {
    let (earliest, latest) = booking_window(today);
    date >= earliest && date <= latest
}

fn extract_date(folded: &str, toks: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    // An explicit date decides alone, even when rejected
    if let Some(caps) = NUMERIC_DATE.captures(folded) {
        return numeric_date(&caps, today);
    }

    if contains_phrase(toks, "depois de amanha") || contains_phrase(toks, "day after tomorrow") {
        return Some(today + Duration::days(2));
    }
    if toks.contains(&"amanha") || toks.contains(&"tomorrow") {
        return Some(today + Duration::days(1));
    }
    if toks.contains(&"hoje") || toks.contains(&"today") {
        return Some(today);
    }

    if let Some(caps) = DAY_OF_MONTH.captures(folded) {
        return day_of_month(&caps, today);
    }

    let mut weekdays = WEEKDAY_WORDS
        .iter()
        .filter(|(word, _)| toks.contains(word))
        .map(|(_, weekday)| *weekday);
    let first = weekdays.next()?;
    if weekdays.any(|other| other != first) {
        return None;
    }
    Some(next_weekday(today, first))
}

fn numeric_date(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;

    match caps.get(3) {
        Some(raw_year) => {
            let mut year: i32 = raw_year.as_str().parse().ok()?;
            if raw_year.as_str().len() == 2 {
                year += 2000;
            }
            NaiveDate::from_ymd_opt(year, month, day).filter(|d| within_window(*d, today))
        }
        None => [today.year(), today.year() + 1]
            .into_iter()
            .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
            .find(|d| within_window(*d, today)),
    }
}

fn day_of_month(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let candidate = if day >= today.day() {
        NaiveDate::from_ymd_opt(today.year(), today.month(), day)
    } else {
        let next_month = today.checked_add_months(Months::new(1))?;
        NaiveDate::from_ymd_opt(next_month.year(), next_month.month(), day)
    };
    candidate.filter(|d| within_window(*d, today))
}

/// Next occurrence strictly after `today`.
fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

fn detect_period(toks: &[&str]) -> Option<Period> {
    toks.iter().enumerate().find_map(|(i, tok)| {
        // "boa tarde" and friends are greetings, not periods
        if i > 0 && matches!(toks[i - 1], "boa" | "bom" | "good") {
            return None;
        }
        match *tok {
            "manha" | "morning" => Some(Period::Morning),
            "tarde" | "afternoon" => Some(Period::Afternoon),
            "noite" | "evening" | "night" => Some(Period::Evening),
            _ => None,
        }
    })
}

fn valid_hm(hour: u32, minute: u32) -> Option<(u32, u32)> {
    (hour <= 23 && minute <= 59).then_some((hour, minute))
}

fn parse_u32(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

/// True when a match is immediately followed by a date separator and digit.
fn continues_as_date(folded: &str, end: usize) -> bool {
    let mut rest = folded[end..].chars();
    matches!(
        (rest.next(), rest.next()),
        (Some('/') | Some('.'), Some(d)) if d.is_ascii_digit()
    )
}

fn am_pm_time(folded: &str) -> Option<NaiveTime> {
    AM_PM.captures_iter(folded).find_map(|caps| {
        let hour = parse_u32(&caps, 1)?;
        let minute = parse_u32(&caps, 2).unwrap_or(0);
        if !(1..=12).contains(&hour) || minute > 59 {
            return None;
        }
        let base = hour % 12;
        let hour = if caps.get(3)?.as_str() == "pm" { base + 12 } else { base };
        NaiveTime::from_hms_opt(hour, minute, 0)
    })
}

fn clock_time(folded: &str) -> Option<(u32, u32)> {
    CLOCK.captures_iter(folded).find_map(|caps| {
        let whole = caps.get(0)?;
        if continues_as_date(folded, whole.end()) {
            return None;
        }
        let hour = parse_u32(&caps, 1)?;
        let minute = parse_u32(&caps, 2)
            .or_else(|| parse_u32(&caps, 3))
            .or_else(|| parse_u32(&caps, 4))
            .unwrap_or(0);
        valid_hm(hour, minute)
    })
}

fn hour_only(folded: &str) -> Option<(u32, u32)> {
    let from = |re: &Regex| {
        re.captures_iter(folded).find_map(|caps| {
            let digits = caps.get(1)?;
            if continues_as_date(folded, digits.end()) {
                return None;
            }
            valid_hm(digits.as_str().parse().ok()?, 0)
        })
    };
    from(&*AT_HOUR).or_else(|| from(&*HOUR_SUFFIX))
}

fn spelled_time(toks: &[&str]) -> Option<(u32, u32)> {
    if contains_phrase(toks, "meio dia") || toks.contains(&"noon") {
        return Some((12, 0));
    }
    toks.iter().enumerate().find_map(|(i, tok)| {
        let hour = HOUR_WORDS.iter().find(|(word, _)| word == tok)?.1;
        let prev = i.checked_sub(1).map(|p| toks[p]);
        let next = toks.get(i + 1).copied();
        let after_next = toks.get(i + 2).copied();

        let introduced = matches!(prev, Some("as" | "a" | "at" | "umas"));
        let followed = matches!(next, Some("hora" | "horas"))
            || (next == Some("o") && after_next == Some("clock"));
        if !introduced && !followed {
            return None;
        }

        let minute = match (next, after_next) {
            (Some("e"), Some("meia")) => 30,
            (Some("e"), Some("quinze")) => 15,
            _ => 0,
        };
        Some((hour, minute))
    })
}

fn extract_time(folded: &str, toks: &[&str]) -> Option<NaiveTime> {
    if let Some(time) = am_pm_time(folded) {
        return Some(time);
    }

    let explicit = clock_time(folded)
        .or_else(|| hour_only(folded))
        .or_else(|| spelled_time(toks));

    match (explicit, detect_period(toks)) {
        (Some((hour, minute)), Some(Period::Afternoon | Period::Evening)) if hour < 12 => {
            NaiveTime::from_hms_opt(hour + 12, minute, 0)
        }
        (Some((hour, minute)), _) => NaiveTime::from_hms_opt(hour, minute, 0),
        (None, Some(period)) => period.default_time(),
        (None, None) => None,
    }
}

fn extract_triggered_name(text: &str, folded: &str) -> Option<String> {
    let (start_char, trigger) = NAME_TRIGGERS.iter().find_map(|(phrase, trigger)| {
        folded.match_indices(phrase).find_map(|(at, _)| {
            let before = folded[..at].chars().next_back();
            let end = at + phrase.len();
            let after = folded[end..].chars().next();
            let bounded = !before.is_some_and(char::is_alphanumeric)
                && after.is_some_and(char::is_whitespace);
            bounded.then(|| (char_offset(folded, end), *trigger))
        })
    })?;

    let rest: String = text.chars().skip(start_char).collect();
    let clause = rest
        .split(|c: char| matches!(c, ',' | '.' | '!' | '?' | ';' | ':' | '\n'))
        .next()
        .unwrap_or("");

    let words: Vec<&str> = clause
        .split_whitespace()
        .take_while(|w| !NAME_STOP_WORDS.contains(&fold(w).as_str()))
        .take(5)
        .collect();

    if trigger == Trigger::Loose && words.iter().any(|w| is_booking_vocabulary(&fold(w))) {
        return None;
    }
    normalize_name(&words)
}

/// True for words that belong to the booking conversation rather than to
/// a person's name.
fn is_booking_vocabulary(word: &str) -> bool {
    NOT_NAME_WORDS.contains(&word)
        || CHAT_VOCABULARY.contains(&word)
        || SERVICE_KEYWORDS
            .iter()
            .any(|(_, keywords)| keywords.contains(&word))
        || WEEKDAY_WORDS.iter().any(|(day, _)| *day == word)
        || HOUR_WORDS.iter().any(|(hour, _)| *hour == word)
        || matches!(word, "manha" | "tarde" | "noite" | "morning" | "afternoon" | "evening")
}

fn extract_bare_name(text: &str) -> Option<String> {
    let trimmed = text.trim().trim_end_matches(['.', '!']);
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() > 5 {
        return None;
    }
    if words
        .iter()
        .any(|w| CHAT_VOCABULARY.contains(&fold(w).as_str()))
    {
        return None;
    }
    normalize_name(&words)
}

/// Title-cases a name of two or more purely alphabetic words.
fn normalize_name(words: &[&str]) -> Option<String> {
    if words.len() < 2 {
        return None;
    }
    if !words.iter().all(|w| w.chars().all(char::is_alphabetic)) {
        return None;
    }

    let parts: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && NAME_PARTICLES.contains(&lower.as_str()) {
                lower
            } else {
                title_case(&lower)
            }
        })
        .collect();
    Some(parts.join(" "))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
