//! Invitation service
//!
//! Sends invitations, records RSVP responses and keeps the seats held by
//! open invitations within the event's guest cap.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{EventraError, EventraResult};
use crate::models::{Event, EventId, Invitation, InvitationId, RsvpStatus, UserId};
use crate::storage::Storage;

pub struct InvitationService<'a> {
    storage: &'a Storage,
}

/// An invitee's answer
#[derive(Debug, Clone)]
pub struct RsvpResponse {
    pub status: RsvpStatus,
    pub guest_count: Option<u32>,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
}

impl RsvpResponse {
    pub fn status(status: RsvpStatus) -> Self {
        Self {
            status,
            guest_count: None,
            dietary_restrictions: None,
            special_requests: None,
        }
    }
}

/// Organizer-side edits; nested options allow clearing
#[derive(Debug, Clone, Default)]
pub struct InvitationUpdate {
    pub invitee_name: Option<Option<String>>,
    pub guest_count: Option<u32>,
    pub dietary_restrictions: Option<Option<String>>,
    pub special_requests: Option<Option<String>>,
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl<'a> InvitationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Invite someone to an event
    ///
    /// Each address can be invited once per event, and the seats it asks for
    /// must fit under the guest cap.
    pub fn send(
        &self,
        event_id: EventId,
        email: &str,
        name: Option<String>,
        guest_count: u32,
        invited_by: UserId,
    ) -> EventraResult<Invitation> {
        let event = self.event(event_id)?;

        let mut invitation = Invitation::new(event.id, email, invited_by, guest_count);
        invitation.invitee_name = clean(name);
        invitation
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;

        let already_invited = self
            .list_for_event(event.id)?
            .iter()
            .any(|i| i.invitee_email == invitation.invitee_email);
        if already_invited {
            return Err(EventraError::Duplicate {
                entity_type: "Invitation",
                identifier: invitation.invitee_email,
            });
        }

        self.check_capacity(&event, None, guest_count)?;

        self.storage.invitations.upsert(invitation.clone())?;
        self.storage.invitations.save()?;
        self.storage.log_create(
            EntityType::Invitation,
            invitation.id.to_string(),
            Some(invitation.invitee_email.clone()),
            &invitation,
        )?;

        tracing::info!(event = %event.id, invitation = %invitation.id, "invitation sent");
        Ok(invitation)
    }

    pub fn get(&self, id: InvitationId) -> EventraResult<Option<Invitation>> {
        self.storage.invitations.get(id)
    }

    /// Find by id reference or invitee email, optionally within one event
    pub fn find(&self, reference: &str, event_id: Option<EventId>) -> EventraResult<Option<Invitation>> {
        self.storage.invitations.find_by_ref(reference, event_id)
    }

    pub fn require(&self, reference: &str, event_id: Option<EventId>) -> EventraResult<Invitation> {
        self.find(reference, event_id)?
            .ok_or_else(|| EventraError::invitation_not_found(reference))
    }

    /// Invitations of one event in the order they were sent
    pub fn list_for_event(&self, event_id: EventId) -> EventraResult<Vec<Invitation>> {
        self.storage.invitations.get_by_event(event_id)
    }

    /// Record an RSVP
    ///
    /// Responses are accepted up to the RSVP deadline (or the event date when
    /// no deadline is set), checked against `today`.
    pub fn respond(
        &self,
        id: InvitationId,
        response: RsvpResponse,
        today: NaiveDate,
    ) -> EventraResult<Invitation> {
        let mut invitation = self
            .storage
            .invitations
            .get(id)?
            .ok_or_else(|| EventraError::invitation_not_found(id.to_string()))?;
        let event = self.event(invitation.event_id)?;

        if !event.rsvp_open(today) {
            let closed_on = event.rsvp_deadline.unwrap_or(event.date);
            return Err(EventraError::Validation(format!(
                "RSVPs for '{}' closed on {}",
                event.title, closed_on
            )));
        }

        let before = invitation.clone();
        if let Some(guest_count) = response.guest_count {
            invitation.guest_count = guest_count;
        }
        if response.dietary_restrictions.is_some() {
            invitation.dietary_restrictions = clean(response.dietary_restrictions);
        }
        if response.special_requests.is_some() {
            invitation.special_requests = clean(response.special_requests);
        }
        invitation.respond(response.status);

        invitation
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;
        if invitation.holds_seats() {
            self.check_capacity(&event, Some(invitation.id), invitation.guest_count)?;
        }

        self.save_update(&before, &invitation)?;
        tracing::info!(invitation = %invitation.id, status = %invitation.status, "rsvp recorded");
        Ok(invitation)
    }

    pub fn update(&self, id: InvitationId, changes: InvitationUpdate) -> EventraResult<Invitation> {
        let mut invitation = self
            .storage
            .invitations
            .get(id)?
            .ok_or_else(|| EventraError::invitation_not_found(id.to_string()))?;
        let event = self.event(invitation.event_id)?;
        let before = invitation.clone();

        if let Some(name) = changes.invitee_name {
            invitation.invitee_name = clean(name);
        }
        if let Some(guest_count) = changes.guest_count {
            invitation.guest_count = guest_count;
        }
        if let Some(dietary) = changes.dietary_restrictions {
            invitation.dietary_restrictions = clean(dietary);
        }
        if let Some(requests) = changes.special_requests {
            invitation.special_requests = clean(requests);
        }

        invitation
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;
        if invitation.holds_seats() && invitation.guest_count > before.guest_count {
            self.check_capacity(&event, Some(invitation.id), invitation.guest_count)?;
        }

        self.save_update(&before, &invitation)?;
        Ok(invitation)
    }

    pub fn delete(&self, id: InvitationId) -> EventraResult<Invitation> {
        let invitation = self
            .storage
            .invitations
            .delete(id)?
            .ok_or_else(|| EventraError::invitation_not_found(id.to_string()))?;
        self.storage.invitations.save()?;

        self.storage.log_delete(
            EntityType::Invitation,
            invitation.id.to_string(),
            Some(invitation.invitee_email.clone()),
            &invitation,
        )?;

        Ok(invitation)
    }

    /// Seats still available under the guest cap, `None` when uncapped
    pub fn remaining_seats(&self, event: &Event) -> EventraResult<Option<u32>> {
        let Some(cap) = event.max_guests else {
            return Ok(None);
        };
        let held = self.seats_held(event.id, None)?;
        Ok(Some(seats_left(cap, held)))
    }

    fn seats_held(&self, event_id: EventId, excluding: Option<InvitationId>) -> EventraResult<u64> {
        Ok(self
            .list_for_event(event_id)?
            .iter()
            .filter(|i| Some(i.id) != excluding && i.holds_seats())
            .map(|i| u64::from(i.guest_count))
            .sum())
    }

    fn check_capacity(
        &self,
        event: &Event,
        excluding: Option<InvitationId>,
        requested: u32,
    ) -> EventraResult<()> {
        let Some(cap) = event.max_guests else {
            return Ok(());
        };
        let remaining = seats_left(cap, self.seats_held(event.id, excluding)?);
        if requested > remaining {
            return Err(EventraError::GuestLimit {
                event: event.title.clone(),
                requested,
                remaining,
            });
        }
        Ok(())
    }

    fn save_update(&self, before: &Invitation, after: &Invitation) -> EventraResult<()> {
        self.storage.invitations.upsert(after.clone())?;
        self.storage.invitations.save()?;
        self.storage.log_update(
            EntityType::Invitation,
            after.id.to_string(),
            Some(after.invitee_email.clone()),
            before,
            after,
            None,
        )
    }

    fn event(&self, id: EventId) -> EventraResult<Event> {
        self.storage
            .events
            .get(id)?
            .ok_or_else(|| EventraError::event_not_found(id.to_string()))
    }
}

/// Seats under `cap` not taken by `held`; never more than `cap`
fn seats_left(cap: u32, held: u64) -> u32 {
    u32::try_from(u64::from(cap).saturating_sub(held)).unwrap_or(cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::EventraPaths;
    use crate::models::{EventCategory, EventDraft, Money};
    use crate::services::EventService;
    use chrono::Utc;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn birthday(storage: &Storage, max_guests: Option<u32>) -> Event {
        let mut draft = EventDraft::new(
            "Mia turns 30",
            EventCategory::Birthday,
            today() + chrono::Duration::days(30),
            "Garden Bar",
            Money::from_units(600),
            10,
        );
        draft.max_guests = max_guests;
        EventService::new(storage).create(draft, UserId::new()).unwrap().0
    }

    #[test]
    fn test_send_and_duplicate() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, None);
        let service = InvitationService::new(&storage);

        let inv = service
            .send(event.id, "Lee@Example.com", Some("Lee".into()), 2, event.owner_id)
            .unwrap();
        assert_eq!(inv.status, RsvpStatus::Pending);
        assert_eq!(inv.invitee_name.as_deref(), Some("Lee"));

        let again = service.send(event.id, "lee@example.com", None, 1, event.owner_id);
        assert!(matches!(again, Err(EventraError::Duplicate { .. })));
    }

    #[test]
    fn test_guest_cap() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, Some(4));
        let service = InvitationService::new(&storage);

        service.send(event.id, "a@example.com", None, 3, event.owner_id).unwrap();
        let err = service
            .send(event.id, "b@example.com", None, 2, event.owner_id)
            .unwrap_err();
        assert!(matches!(
            err,
            EventraError::GuestLimit { requested: 2, remaining: 1, .. }
        ));
        assert_eq!(service.remaining_seats(&event).unwrap(), Some(1));
    }

    #[test]
    fn test_seat_count_survives_huge_parties() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, None);
        let service = InvitationService::new(&storage);

        service
            .send(event.id, "a@example.com", None, u32::MAX, event.owner_id)
            .unwrap();
        service
            .send(event.id, "b@example.com", None, u32::MAX, event.owner_id)
            .unwrap();
        assert_eq!(service.remaining_seats(&event).unwrap(), None);

        let changes = crate::services::EventUpdate {
            max_guests: Some(Some(50)),
            ..Default::default()
        };
        let capped = EventService::new(&storage).update(event.id, changes).unwrap();
        assert_eq!(service.remaining_seats(&capped).unwrap(), Some(0));

        let err = service
            .send(capped.id, "c@example.com", None, 1, capped.owner_id)
            .unwrap_err();
        assert!(matches!(
            err,
            EventraError::GuestLimit { requested: 1, remaining: 0, .. }
        ));
    }

    #[test]
    fn test_decline_frees_seats() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, Some(4));
        let service = InvitationService::new(&storage);

        let a = service.send(event.id, "a@example.com", None, 3, event.owner_id).unwrap();
        service
            .respond(a.id, RsvpResponse::status(RsvpStatus::Declined), today())
            .unwrap();
        service.send(event.id, "b@example.com", None, 4, event.owner_id).unwrap();
        assert_eq!(service.remaining_seats(&event).unwrap(), Some(0));
    }

    #[test]
    fn test_respond_updates_details() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, None);
        let service = InvitationService::new(&storage);
        let inv = service.send(event.id, "a@example.com", None, 1, event.owner_id).unwrap();

        let answered = service
            .respond(
                inv.id,
                RsvpResponse {
                    status: RsvpStatus::Accepted,
                    guest_count: Some(2),
                    dietary_restrictions: Some("vegetarian".into()),
                    special_requests: None,
                },
                today(),
            )
            .unwrap();
        assert_eq!(answered.status, RsvpStatus::Accepted);
        assert_eq!(answered.guest_count, 2);
        assert_eq!(answered.dietary_restrictions.as_deref(), Some("vegetarian"));
        assert!(answered.responded_at.is_some());
    }

    #[test]
    fn test_respond_after_deadline() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, None);
        let service = InvitationService::new(&storage);
        let inv = service.send(event.id, "a@example.com", None, 1, event.owner_id).unwrap();

        let too_late = event.date + chrono::Duration::days(1);
        let err = service
            .respond(inv.id, RsvpResponse::status(RsvpStatus::Accepted), too_late)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            service.get(inv.id).unwrap().unwrap().status,
            RsvpStatus::Pending
        );
    }

    #[test]
    fn test_find_by_email_and_delete() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, None);
        let service = InvitationService::new(&storage);
        let inv = service.send(event.id, "a@example.com", None, 1, event.owner_id).unwrap();

        let found = service.require("A@example.com", Some(event.id)).unwrap();
        assert_eq!(found.id, inv.id);

        service.delete(inv.id).unwrap();
        assert!(service.list_for_event(event.id).unwrap().is_empty());
    }

    #[test]
    fn test_update_checks_capacity() {
        let (_temp, storage) = setup();
        let event = birthday(&storage, Some(3));
        let service = InvitationService::new(&storage);
        let inv = service.send(event.id, "a@example.com", None, 1, event.owner_id).unwrap();

        let too_many = InvitationUpdate {
            guest_count: Some(5),
            ..Default::default()
        };
        assert!(matches!(
            service.update(inv.id, too_many),
            Err(EventraError::GuestLimit { .. })
        ));

        let renamed = service
            .update(
                inv.id,
                InvitationUpdate {
                    invitee_name: Some(Some("Ari".into())),
                    guest_count: Some(3),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.display_name(), "Ari");
    }
}
