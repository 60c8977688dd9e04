//! Fake-record builder.
//!
//! Every provider samples from a caller-supplied [`Rng`] and computes its date
//! bounds from a single reference instant, so a seeded generator reproduces
//! the same records for the same `now`.

use bson::oid::ObjectId;
use chrono::DateTime;
use chrono::Duration;
use chrono::Months;
use chrono::NaiveDate;
use chrono::Utc;
use enum_iterator::all;
use enum_iterator::Sequence;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::FirstName;
use fake::faker::name::en::LastName;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use fake::Faker;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::Error;
use crate::error::Result;
use crate::records::Allergy;
use crate::records::Child;
use crate::records::Credential;
use crate::records::EmergencyContact;
use crate::records::Event;
use crate::records::Staff;
use crate::records::DETAILS_MAX_CHARS;
use crate::records::MAX_ALLERGIES;
use crate::records::MAX_CREDENTIALS;
use crate::records::NOTES_MAX_CHARS;

pub const RECENT_WINDOW_DAYS: i64 = 30;
pub const HISTORICAL_WINDOW_DAYS: i64 = 600;
const MIN_CHILD_AGE_YEARS: u32 = 1;
const MAX_CHILD_AGE_YEARS: u32 = 6;
const ENROLLMENT_YEARS: u32 = 3;
const HIRE_YEARS: u32 = 5;

/// Half-open range of instants `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl Window {
    pub fn try_new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from >= to {
            return Err(Error::InvalidWindow { from, to });
        }

        Ok(Self { from, to })
    }

    /// The last 30 days before `now`.
    pub fn recent(now: DateTime<Utc>) -> Result<Self> {
        Self::try_new(now - Duration::days(RECENT_WINDOW_DAYS), now)
    }

    /// From 600 days ago up to where [`Window::recent`] starts.
    pub fn historical(now: DateTime<Utc>) -> Result<Self> {
        Self::try_new(
            now - Duration::days(HISTORICAL_WINDOW_DAYS),
            now - Duration::days(RECENT_WINDOW_DAYS),
        )
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.from <= *ts && *ts < self.to
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> DateTime<Utc> {
        let span = (self.to - self.from).num_milliseconds();
        if span <= 0 {
            return self.from;
        }
        self.from + Duration::milliseconds(rng.gen_range(0..span))
    }
}

/// Windows to fill with events, oldest first.
pub fn event_windows(now: DateTime<Utc>, generate_old_events: bool) -> Result<Vec<Window>> {
    let mut windows = Vec::with_capacity(2);
    if generate_old_events {
        windows.push(Window::historical(now)?);
    }
    windows.push(Window::recent(now)?);

    Ok(windows)
}

fn years_before(date: NaiveDate, years: u32) -> Result<NaiveDate> {
    date.checked_sub_months(Months::new(years * 12))
        .ok_or_else(|| Error::Internal(format!("can't go {years} years back from {date}")))
}

/// Uniform calendar date in `[from, to]`.
fn date_between<R: Rng>(rng: &mut R, from: NaiveDate, to: NaiveDate) -> NaiveDate {
    let days = (to - from).num_days().max(0);
    from + Duration::days(rng.gen_range(0..=days))
}

/// Up to `max` distinct variants of `T`.
fn sample_distinct<T: Sequence + Copy, R: Rng>(rng: &mut R, max: usize) -> Vec<T> {
    let variants: Vec<T> = all::<T>().collect();
    let n = rng.gen_range(0..=max.min(variants.len()));
    variants.choose_multiple(rng, n).copied().collect()
}

/// Lorem text of at most `max_chars` characters, ending in a period.
pub fn text<R: Rng>(rng: &mut R, max_chars: usize) -> String {
    if max_chars < 2 {
        return ".".repeat(max_chars);
    }

    let words = rng.gen_range(2..=12);
    let mut out = String::with_capacity(max_chars);
    for _ in 0..words {
        let word: String = Word().fake_with_rng(rng);
        let sep = if out.is_empty() { 0 } else { 1 };
        // trailing period
        if out.chars().count() + sep + word.chars().count() + 1 > max_chars {
            break;
        }
        if sep == 1 {
            out.push(' ');
        }
        out.push_str(&word);
    }

    if out.is_empty() {
        let word: String = Word().fake_with_rng(rng);
        out.extend(word.chars().take(max_chars - 1));
    }

    let mut chars = out.chars();
    let mut text = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    text.push('.');

    text
}

pub struct ChildProvider {
    dob_from: NaiveDate,
    dob_to: NaiveDate,
    enrollment: Window,
}

impl ChildProvider {
    pub fn try_new(now: DateTime<Utc>) -> Result<Self> {
        let today = now.date_naive();
        let enrollment_from = now
            .checked_sub_months(Months::new(ENROLLMENT_YEARS * 12))
            .ok_or_else(|| Error::Internal(format!("can't go back from {now}")))?;

        Ok(Self {
            dob_from: years_before(today, MAX_CHILD_AGE_YEARS)?,
            dob_to: years_before(today, MIN_CHILD_AGE_YEARS)?,
            enrollment: Window::try_new(enrollment_from, now)?,
        })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Child {
        Child {
            first_name: FirstName().fake_with_rng(rng),
            last_name: LastName().fake_with_rng(rng),
            date_of_birth: date_between(rng, self.dob_from, self.dob_to),
            enrollment_date: self.enrollment.sample(rng),
            allergies: sample_distinct::<Allergy, _>(rng, MAX_ALLERGIES),
            emergency_contact: EmergencyContact {
                name: Name().fake_with_rng(rng),
                phone: PhoneNumber().fake_with_rng(rng),
                relationship: Faker.fake_with_rng(rng),
            },
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R, n: usize) -> Vec<Child> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

pub struct StaffProvider {
    hired_from: NaiveDate,
    hired_to: NaiveDate,
}

impl StaffProvider {
    pub fn try_new(now: DateTime<Utc>) -> Result<Self> {
        let today = now.date_naive();

        Ok(Self {
            hired_from: years_before(today, HIRE_YEARS)?,
            hired_to: today,
        })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Staff {
        Staff {
            first_name: FirstName().fake_with_rng(rng),
            last_name: LastName().fake_with_rng(rng),
            hire_date: date_between(rng, self.hired_from, self.hired_to),
            role: Faker.fake_with_rng(rng),
            credentials: sample_distinct::<Credential, _>(rng, MAX_CREDENTIALS),
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R, n: usize) -> Vec<Staff> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

pub struct EventProvider {
    events_per_child: usize,
}

impl EventProvider {
    pub fn new(events_per_child: usize) -> Self {
        Self { events_per_child }
    }

    pub fn sample<R: Rng>(
        &self,
        rng: &mut R,
        window: &Window,
        child_id: ObjectId,
        staff_ids: &[ObjectId],
    ) -> Result<Event> {
        let staff_id = *staff_ids.choose(rng).ok_or(Error::NoStaff)?;

        Ok(Event {
            child_id,
            staff_id,
            timestamp: window.sample(rng),
            event_type: Faker.fake_with_rng(rng),
            details: text(rng, DETAILS_MAX_CHARS),
            notes: text(rng, NOTES_MAX_CHARS),
        })
    }

    /// `events_per_child` events for every child, per window, windows in order.
    pub fn generate<R: Rng>(
        &self,
        rng: &mut R,
        windows: &[Window],
        child_ids: &[ObjectId],
        staff_ids: &[ObjectId],
    ) -> Result<Vec<Event>> {
        if staff_ids.is_empty() && !child_ids.is_empty() && self.events_per_child > 0 {
            return Err(Error::NoStaff);
        }

        let mut events =
            Vec::with_capacity(windows.len() * child_ids.len() * self.events_per_child);
        for window in windows {
            debug!("events window {} - {}", window.from(), window.to());
            for child_id in child_ids {
                for _ in 0..self.events_per_child {
                    events.push(self.sample(rng, window, *child_id, staff_ids)?);
                }
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_rejects_empty_range() {
        let t = now();
        assert!(matches!(
            Window::try_new(t, t),
            Err(Error::InvalidWindow { .. })
        ));
        assert!(Window::try_new(t, t - Duration::seconds(1)).is_err());
    }

    #[test]
    fn test_windows_are_disjoint() {
        let recent = Window::recent(now()).unwrap();
        let historical = Window::historical(now()).unwrap();
        assert_eq!(historical.to(), recent.from());
        assert!(!historical.contains(&recent.from()));
        assert_eq!(event_windows(now(), false).unwrap(), vec![recent]);
        assert_eq!(event_windows(now(), true).unwrap(), vec![historical, recent]);
    }

    #[test]
    fn test_children_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let provider = ChildProvider::try_new(now()).unwrap();
        let dob_from = NaiveDate::from_ymd_opt(2020, 10, 19).unwrap();
        let dob_to = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
        let enrolled_from = Utc.with_ymd_and_hms(2023, 10, 19, 12, 0, 0).unwrap();

        for child in provider.generate(&mut rng, 500) {
            assert!(child.date_of_birth >= dob_from && child.date_of_birth <= dob_to);
            assert!(child.enrollment_date >= enrolled_from && child.enrollment_date < now());
            assert!(child.allergies.len() <= MAX_ALLERGIES);
            let uniq: HashSet<_> = child.allergies.iter().collect();
            assert_eq!(uniq.len(), child.allergies.len());
            assert!(!child.first_name.is_empty());
            assert!(!child.emergency_contact.phone.is_empty());
        }
    }

    #[test]
    fn test_staff_within_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let provider = StaffProvider::try_new(now()).unwrap();
        let hired_from = NaiveDate::from_ymd_opt(2021, 10, 19).unwrap();
        let today = now().date_naive();

        let mut seen_max = false;
        for staff in provider.generate(&mut rng, 500) {
            assert!(staff.hire_date >= hired_from && staff.hire_date <= today);
            assert!(staff.credentials.len() <= MAX_CREDENTIALS);
            let uniq: HashSet<_> = staff.credentials.iter().collect();
            assert_eq!(uniq.len(), staff.credentials.len());
            seen_max |= staff.credentials.len() == MAX_CREDENTIALS;
        }
        assert!(seen_max);
    }

    #[test]
    fn test_text_limits() {
        let mut rng = StdRng::seed_from_u64(3);
        for max in [1, 2, 5, 50, 100] {
            for _ in 0..200 {
                let t = text(&mut rng, max);
                assert!(t.chars().count() <= max, "{t:?} longer than {max}");
                assert!(!t.is_empty());
            }
        }
    }

    #[test]
    fn test_events_reference_given_ids() {
        let mut rng = StdRng::seed_from_u64(4);
        let children: Vec<ObjectId> = (0..3).map(|_| ObjectId::new()).collect();
        let staff: Vec<ObjectId> = (0..2).map(|_| ObjectId::new()).collect();
        let windows = event_windows(now(), false).unwrap();

        let events = EventProvider::new(7)
            .generate(&mut rng, &windows, &children, &staff)
            .unwrap();
        assert_eq!(events.len(), 21);
        for (idx, event) in events.iter().enumerate() {
            assert_eq!(event.child_id, children[idx / 7]);
            assert!(staff.contains(&event.staff_id));
            assert!(windows[0].contains(&event.timestamp));
            assert!(event.details.chars().count() <= DETAILS_MAX_CHARS);
            assert!(event.notes.chars().count() <= NOTES_MAX_CHARS);
        }
    }

    #[test]
    fn test_events_without_staff() {
        let mut rng = StdRng::seed_from_u64(5);
        let windows = event_windows(now(), false).unwrap();
        let res = EventProvider::new(1).generate(&mut rng, &windows, &[ObjectId::new()], &[]);
        assert!(matches!(res, Err(Error::NoStaff)));
    }

    #[test]
    fn test_same_seed_same_records() {
        let provider = StaffProvider::try_new(now()).unwrap();
        let a = provider.generate(&mut StdRng::seed_from_u64(9), 20);
        let b = provider.generate(&mut StdRng::seed_from_u64(9), 20);
        assert_eq!(a, b);
    }
}
