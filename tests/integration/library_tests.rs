//! Registry behaviour through the public API

use library_manager::AppError;

use crate::library;

#[test]
fn test_add_book_then_report_shows_all_copies_available() {
    for copies in [1, 2, 7, 250] {
        let (mut lib, _) = library();
        lib.add_book("Dune", "Frank Herbert", copies).unwrap();

        let report = lib.generate_report();
        assert_eq!(report.total_copies, u64::from(copies));
        assert_eq!(report.available_copies, u64::from(copies));
        assert_eq!(report.availability_percentage, 100.0);
    }
}

#[test]
fn test_borrow_never_goes_below_zero() {
    let (mut lib, _) = library();
    lib.add_book("Dune", "Frank Herbert", 2).unwrap();
    let bob = lib.add_user("Bob").unwrap();

    lib.borrow_book(bob, "Dune").unwrap();
    lib.borrow_book(bob, "Dune").unwrap();
    for _ in 0..3 {
        assert!(matches!(
            lib.borrow_book(bob, "Dune"),
            Err(AppError::NoCopiesAvailable(_))
        ));
    }
    assert_eq!(lib.book("Dune").unwrap().available_copies, 0);
}

#[test]
fn test_return_restores_availability_without_reservations() {
    let (mut lib, clock) = library();
    lib.add_book("Dune", "Frank Herbert", 3).unwrap();
    let bob = lib.add_user("Bob").unwrap();
    let ann = lib.add_user("Ann").unwrap();

    lib.borrow_book(ann, "Dune").unwrap();
    let before = lib.book("Dune").unwrap().available_copies;

    lib.borrow_book(bob, "Dune").unwrap();
    clock.advance_days(30);
    let outcome = lib.return_book(bob, "Dune").unwrap();

    assert_eq!(outcome.held_for, None);
    assert!(outcome.loan.was_returned_late());
    assert_eq!(lib.book("Dune").unwrap().available_copies, before);
}

#[test]
fn test_reservations_are_served_first_in_first_out() {
    let (mut lib, _) = library();
    lib.add_book("Dune", "Frank Herbert", 2).unwrap();
    let bob = lib.add_user("Bob").unwrap();
    let eve = lib.add_user("Eve").unwrap();
    let ann = lib.add_user("Ann").unwrap();
    let cid = lib.add_user("Cid").unwrap();

    lib.borrow_book(bob, "Dune").unwrap();
    lib.borrow_book(eve, "Dune").unwrap();
    assert_eq!(lib.reserve_book(ann, "Dune").unwrap(), 1);
    assert_eq!(lib.reserve_book(cid, "Dune").unwrap(), 2);

    assert_eq!(lib.return_book(eve, "Dune").unwrap().held_for, Some(ann));
    assert!(matches!(
        lib.borrow_book(cid, "Dune"),
        Err(AppError::NoCopiesAvailable(_))
    ));

    assert_eq!(lib.return_book(bob, "Dune").unwrap().held_for, Some(cid));
    lib.borrow_book(cid, "Dune").unwrap();
    lib.borrow_book(ann, "Dune").unwrap();

    let dune = lib.book("Dune").unwrap();
    assert!(dune.reservation_queue.is_empty());
    assert!(dune.held_for.is_empty());
    assert_eq!(dune.copies_on_loan(), 2);
}

#[test]
fn test_dune_scenario() {
    let (mut lib, _) = library();
    lib.add_book("Dune", "Frank Herbert", 1).unwrap();
    let bob = lib.add_user("Bob").unwrap();

    lib.borrow_book(bob, "Dune").unwrap();
    assert!(matches!(
        lib.borrow_book(bob, "Dune"),
        Err(AppError::NoCopiesAvailable(_))
    ));
    lib.return_book(bob, "Dune").unwrap();

    let report = lib.generate_report();
    assert_eq!(report.available_copies, 1);
    assert_eq!(report.active_loans, 0);
}

#[test]
fn test_remove_user_with_active_loan() {
    let (mut lib, _) = library();
    lib.add_book("Dune", "Frank Herbert", 1).unwrap();
    let bob = lib.add_user("Bob").unwrap();
    lib.borrow_book(bob, "Dune").unwrap();

    assert!(matches!(
        lib.remove_user(bob),
        Err(AppError::UserHasActiveLoans(id)) if id == bob
    ));
    assert!(lib.user(bob).is_some());

    lib.return_book(bob, "Dune").unwrap();
    let removed = lib.remove_user(bob).unwrap();
    assert_eq!(removed.loans.len(), 1);
}

#[test]
fn test_overdue_report_follows_the_calendar() {
    let (mut lib, clock) = library();
    lib.add_book("Dune", "Frank Herbert", 1).unwrap();
    let bob = lib.add_user("Bob").unwrap();
    lib.borrow_book(bob, "Dune").unwrap();

    clock.advance_days(14);
    assert_eq!(lib.generate_report().overdue_loans, 0);

    clock.advance_days(1);
    assert_eq!(lib.generate_report().overdue_loans, 1);
    assert_eq!(lib.overdue_loans().count(), 1);

    lib.return_book(bob, "Dune").unwrap();
    assert_eq!(lib.overdue_loans().count(), 0);
}
