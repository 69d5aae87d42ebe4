//! Concurrent bookings against the same time window.

mod common;

use std::sync::Arc;

use barber_booking::application::{
    ChatInput, CreateBookingCommand, HandleChatMessageCommand, RegisterClientCommand,
};
use barber_booking::domain::conversation::DialogueState;
use barber_booking::domain::scheduling::BookingError;
use common::{hm, phone, today, TestApp};

async fn register_many(app: &TestApp, count: u32) {
    for n in 0..count {
        app.register
            .handle(RegisterClientCommand {
                name: format!("Cliente {}", n),
                phone: phone(n),
            })
            .await
            .unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_slot_is_sold_exactly_once() {
    let app = TestApp::new();
    register_many(&app, 16).await;

    let mut tasks = Vec::new();
    for n in 0..16 {
        let create = Arc::clone(&app.create);
        tasks.push(tokio::spawn(async move {
            create
                .handle(CreateBookingCommand {
                    phone: phone(n),
                    service: "Corte".to_string(),
                    date: today(),
                    time: hm(10, 0),
                })
                .await
        }));
    }

    let mut booked = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => booked += 1,
            Err(BookingError::Conflict {
                requested,
                next_available,
            }) => {
                assert_eq!(requested, hm(10, 0));
                assert_eq!(next_available, Some(hm(10, 30)));
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(booked, 1);
    assert_eq!(app.appointments.all().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_windows_with_different_starts_conflict() {
    let app = TestApp::new();
    register_many(&app, 2).await;

    let corte = {
        let create = Arc::clone(&app.create);
        tokio::spawn(async move {
            create
                .handle(CreateBookingCommand {
                    phone: phone(0),
                    service: "Corte".to_string(),
                    date: today(),
                    time: hm(10, 0),
                })
                .await
        })
    };
    let barba = {
        let create = Arc::clone(&app.create);
        tokio::spawn(async move {
            create
                .handle(CreateBookingCommand {
                    phone: phone(1),
                    service: "Barba".to_string(),
                    date: today(),
                    time: hm(10, 15),
                })
                .await
        })
    };

    let results = [corte.await.unwrap(), barba.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(BookingError::Conflict { .. }))));
}

#[tokio::test]
async fn adjacent_windows_both_succeed() {
    let app = TestApp::new();
    register_many(&app, 2).await;

    for (n, time) in [(0, hm(10, 0)), (1, hm(10, 30))] {
        app.create
            .handle(CreateBookingCommand {
                phone: phone(n),
                service: "Corte".to_string(),
                date: today(),
                time,
            })
            .await
            .unwrap();
    }
    assert_eq!(app.appointments.all().await.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_chats_confirming_the_same_slot_book_once() {
    let app = TestApp::new();
    register_many(&app, 2).await;

    for n in 0..2 {
        let reply = app
            .dialogue
            .handle(HandleChatMessageCommand {
                phone: phone(n),
                input: ChatInput::Text("corte hoje às 10h".to_string()),
            })
            .await;
        assert_eq!(reply.state, Some(DialogueState::Confirm));
    }

    let mut tasks = Vec::new();
    for n in 0..2 {
        let dialogue = Arc::clone(&app.dialogue);
        tasks.push(tokio::spawn(async move {
            dialogue
                .handle(HandleChatMessageCommand {
                    phone: phone(n),
                    input: ChatInput::Text("sim".to_string()),
                })
                .await
        }));
    }

    let mut replies = Vec::new();
    for task in tasks {
        replies.push(task.await.unwrap());
    }

    let committed: Vec<_> = replies.iter().filter(|r| r.appointment.is_some()).collect();
    assert_eq!(committed.len(), 1);

    let lost = replies
        .iter()
        .find(|r| r.appointment.is_none())
        .expect("one customer loses the race");
    assert_eq!(lost.state, Some(DialogueState::Confirm));
    assert!(lost.reply.contains("10:30"));
    assert_eq!(app.appointments.all().await.len(), 1);
}
