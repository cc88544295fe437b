//! Fan-out and connection lifecycle helpers.
//!
//! All of these run while the hub holds the session lock, so a broadcast
//! is part of the same atomic step as the mutation that caused it.

use crate::protocol::DISCONNECT_NOTICE;
use crate::{ConnectionId, ServerMessage, Session};
use arena_board::Role;
use tracing::{debug, info, instrument, warn};

/// Sends a message to every registered connection.
///
/// A connection that cannot be reached is dropped from the registry and
/// delivery carries on with the rest.
#[instrument(skip(session, message), fields(message = %message, recipients = session.connection_count()))]
pub fn broadcast(session: &mut Session, message: &ServerMessage) {
    let failed: Vec<ConnectionId> = session
        .seats()
        .filter_map(|(id, seat)| seat.handle().send(message).err().map(|_| id))
        .collect();

    for id in failed {
        warn!(connection_id = %id, "Send failed during broadcast, dropping connection");
        session.remove_connection(id);
    }
}

/// Resets the game if the opponent of `role` no longer holds a seat.
///
/// Returns `true` when a reset happened, in which case the caller skips
/// the message that triggered the check. Spectators never trigger one.
#[instrument(skip(session))]
pub fn check_peer_disconnect(session: &mut Session, id: ConnectionId, role: Role) -> bool {
    let Some(mark) = role.mark() else {
        return false;
    };

    if session.holder_of(mark.opponent()).is_some() {
        return false;
    }

    info!(missing = %mark.opponent(), "Opponent seat is empty, resetting game");

    let notice = ServerMessage::Disconnected(DISCONNECT_NOTICE.to_string());
    let delivered = session
        .seat(id)
        .map(|seat| seat.handle().send(&notice).is_ok());
    if delivered == Some(false) {
        warn!(connection_id = %id, "Could not deliver disconnect notice");
        session.remove_connection(id);
    }

    session.reset();
    let snapshot = session.snapshot();
    broadcast(session, &snapshot);
    true
}

/// Closes every registered connection and empties the registry.
#[instrument(skip(session), fields(count = session.connection_count()))]
pub fn close_all(session: &mut Session) {
    for id in session.connection_ids() {
        if let Some(seat) = session.remove_connection(id)
            && let Err(e) = seat.handle().close()
        {
            debug!(error = %e, "Close request not delivered");
        }
    }
    info!("All connections closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionIds;
    use crate::{ConnectionHandle, Outbound};
    use arena_board::Mark;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn join(
        session: &mut Session,
        ids: &ConnectionIds,
    ) -> (ConnectionId, UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(ids.allocate(), None, tx);
        let id = handle.id();
        session.assign_role(handle);
        (id, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Outbound>) -> Vec<Outbound> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (_, mut rx1) = join(&mut session, &ids);
        let (_, mut rx2) = join(&mut session, &ids);

        broadcast(&mut session, &ServerMessage::Draw);

        assert_eq!(drain(&mut rx1), vec![Outbound::Text("DRAW".into())]);
        assert_eq!(drain(&mut rx2), vec![Outbound::Text("DRAW".into())]);
    }

    #[test]
    fn test_broadcast_prunes_dead_connections() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (alive, mut rx_alive) = join(&mut session, &ids);
        let (dead, rx_dead) = join(&mut session, &ids);
        let (_, mut rx_late) = join(&mut session, &ids);
        drop(rx_dead);

        broadcast(&mut session, &ServerMessage::Win(Mark::O));

        assert!(session.is_registered(alive));
        assert!(!session.is_registered(dead));
        assert_eq!(session.connection_count(), 2);
        assert_eq!(drain(&mut rx_alive), vec![Outbound::Text("WIN|O".into())]);
        assert_eq!(drain(&mut rx_late), vec![Outbound::Text("WIN|O".into())]);
    }

    #[test]
    fn test_spectator_never_triggers_reset() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (id, _rx) = join(&mut session, &ids);
        assert!(!check_peer_disconnect(&mut session, id, Role::Spectator));
    }

    #[test]
    fn test_no_reset_while_opponent_seated() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (o, mut rx_o) = join(&mut session, &ids);
        let (_x, _rx_x) = join(&mut session, &ids);

        assert!(!check_peer_disconnect(&mut session, o, Role::Player(Mark::O)));
        assert!(drain(&mut rx_o).is_empty());
    }

    #[test]
    fn test_missing_opponent_resets_and_notifies() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (o, mut rx_o) = join(&mut session, &ids);
        let (x, _rx_x) = join(&mut session, &ids);
        let (_s, mut rx_s) = join(&mut session, &ids);
        session.apply_move(arena_board::Move::new(Mark::X, arena_board::Position::Center));
        session.remove_connection(x);

        assert!(check_peer_disconnect(&mut session, o, Role::Player(Mark::O)));

        assert_eq!(
            drain(&mut rx_o),
            vec![
                Outbound::Text(format!("DISC|{DISCONNECT_NOTICE}")),
                Outbound::Text(",,,,,,,,|X".into()),
            ]
        );
        assert_eq!(drain(&mut rx_s), vec![Outbound::Text(",,,,,,,,|X".into())]);
        assert_eq!(session.board(), &arena_board::Board::new());
    }

    #[test]
    fn test_close_all_empties_registry() {
        let ids = ConnectionIds::default();
        let mut session = Session::new();
        let (_, mut rx1) = join(&mut session, &ids);
        let (_, rx2) = join(&mut session, &ids);
        drop(rx2);

        close_all(&mut session);

        assert_eq!(session.connection_count(), 0);
        assert_eq!(drain(&mut rx1), vec![Outbound::Close]);
    }
}
