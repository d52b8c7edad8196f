/// Salary calculation tests through the HTTP API
///
/// Periods are taken from early 2001 so they are fully elapsed and free of
/// holidays created by other tests.

mod common;

use axum::http::StatusCode;
use common::{date, decimal, time, TestContext};
use paydesk_shared::models::{
    attendance::{Attendance, CreateAttendance},
    employer::Employer,
    salary_summary::SalarySummary,
};
use paydesk_shared::payroll::PayPeriod;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

/// Inserts attendance on the given days of February 2001
async fn attend_february(
    ctx: &TestContext,
    employer: &Employer,
    days: impl Iterator<Item = u32>,
    late: &[u32],
) {
    for day in days {
        let arrival = if late.contains(&day) { time(9, 30) } else { time(9, 0) };
        Attendance::create(
            &ctx.db,
            CreateAttendance {
                employer_id: employer.id,
                department_id: employer.department_id,
                date: date(2001, 2, day),
                attendance_time: arrival,
                leave_time: Some(time(17, 0)),
            },
        )
        .await
        .unwrap();
    }
}

async fn calculate(ctx: &TestContext, body: Value) -> (StatusCode, Value) {
    ctx.send("POST", "/salary/calculate", Some(body)).await
}

#[tokio::test]
async fn test_monthly_salary_scenario() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(12000), time(9, 0), time(17, 0))
        .await
        .unwrap();
    attend_february(&ctx, &employer, 1..=20, &[3, 7, 11]).await;

    let (status, summary) = calculate(
        &ctx,
        json!({ "employer_id": employer.id, "year": 2001, "month": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", summary);

    // 28 working days, 20 attended
    assert_eq!(decimal(&summary["hours_per_day"]), dec!(8));
    assert_eq!(decimal(&summary["hourly_rate"]), dec!(50));
    assert_eq!(decimal(&summary["daily_rate"]), dec!(400));
    assert_eq!(summary["attendance_days"], 20);
    assert_eq!(summary["absent_days"], 8);
    assert_eq!(summary["late_days"], 3);
    assert_eq!(decimal(&summary["worked_salary"]), dec!(8000));
    assert_eq!(decimal(&summary["absent_deduction"]), dec!(3200));
    assert_eq!(decimal(&summary["final_salary"]), dec!(4800));

    // A two hour deduction costs two hourly rates
    let (status, body) = ctx
        .send(
            "POST",
            "/adjustments",
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-02-10",
                "value": "2",
                "value_type": "hours",
                "kind": "deduction",
                "reason": "Left early"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let period = PayPeriod::new(2001, 2).unwrap();
    let repriced = SalarySummary::find_for_period(&ctx.db, employer.id, period)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(repriced.final_salary, dec!(4700));
    assert_eq!(repriced.total_deductions, dec!(100));
    assert_eq!(repriced.id.to_string(), summary["id"].as_str().unwrap());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_recalculation_is_idempotent() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(10000), time(8, 0), time(15, 0))
        .await
        .unwrap();
    attend_february(&ctx, &employer, 1..=10, &[]).await;

    let request = json!({ "employer_id": employer.id, "year": 2001, "month": 2 });
    let (_, mut first) = calculate(&ctx, request.clone()).await;
    let (status, mut second) = calculate(&ctx, request).await;
    assert_eq!(status, StatusCode::OK);

    for summary in [&mut first, &mut second] {
        summary.as_object_mut().unwrap().remove("updated_at");
    }
    assert_eq!(first, second);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_zero_attendance_pays_nothing() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(9000), time(9, 0), time(17, 0))
        .await
        .unwrap();

    let (status, body) = ctx
        .send(
            "POST",
            "/adjustments",
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-02-14",
                "value": "1500",
                "value_type": "money",
                "kind": "addition",
                "reason": "Bonus"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, history) = ctx
        .send("GET", &format!("/salary/summary/{}", employer.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let entry = &history[0];
    assert_eq!(entry["period"], "2001-02");
    assert_eq!(entry["month_name"], "February");
    assert_eq!(decimal(&entry["total_additions"]), dec!(1500));
    assert_eq!(decimal(&entry["final_salary"]), dec!(0));
    assert_eq!(decimal(&entry["salary_difference"]), dec!(-9000));
    assert_eq!(decimal(&entry["attendance_rate"]), dec!(0));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_moving_adjustment_reprices_both_months() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(12000), time(9, 0), time(17, 0))
        .await
        .unwrap();
    attend_february(&ctx, &employer, 1..=28, &[]).await;
    Attendance::create(
        &ctx.db,
        CreateAttendance {
            employer_id: employer.id,
            department_id: employer.department_id,
            date: date(2001, 3, 1),
            attendance_time: time(9, 0),
            leave_time: None,
        },
    )
    .await
    .unwrap();

    let (status, created) = ctx
        .send(
            "POST",
            "/adjustments",
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-02-20",
                "value": "250",
                "value_type": "money",
                "kind": "addition",
                "reason": "Overtime"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);

    let february = PayPeriod::new(2001, 2).unwrap();
    let march = PayPeriod::new(2001, 3).unwrap();

    let feb = SalarySummary::find_for_period(&ctx.db, employer.id, february)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(feb.total_additions, dec!(250));

    let (status, body) = ctx
        .send(
            "PUT",
            &format!("/adjustments/{}", created["id"].as_str().unwrap()),
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-03-01",
                "value": "250",
                "value_type": "money",
                "kind": "addition",
                "reason": "Overtime"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let feb = SalarySummary::find_for_period(&ctx.db, employer.id, february)
        .await
        .unwrap()
        .unwrap();
    let mar = SalarySummary::find_for_period(&ctx.db, employer.id, march)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(feb.total_additions, dec!(0));
    assert_eq!(mar.total_additions, dec!(250));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_deduction_larger_than_a_day_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(3000), time(9, 0), time(17, 0))
        .await
        .unwrap();

    // Daily rate is 100
    let (status, body) = ctx
        .send(
            "POST",
            "/adjustments",
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-02-10",
                "value": "150",
                "value_type": "money",
                "kind": "deduction",
                "reason": "Damage"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "value");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_calculate_rejects_bad_input() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(9000), time(9, 0), time(17, 0))
        .await
        .unwrap();

    let (status, body) = calculate(
        &ctx,
        json!({ "employer_id": employer.id, "year": 2001, "month": 13 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "month");

    let (status, body) = calculate(
        &ctx,
        json!({ "employer_id": employer.id, "year": 1999, "month": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "year");
    assert_eq!(body["details"].as_array().unwrap().len(), 1);

    let (status, _) = calculate(&ctx, json!({ "employer_id": uuid::Uuid::new_v4() })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_salary_listing_pages_and_filters() {
    let ctx = TestContext::new().await.unwrap();

    for salary in [dec!(8000), dec!(9000)] {
        let employer = ctx
            .create_employer(salary, time(9, 0), time(17, 0))
            .await
            .unwrap();
        attend_february(&ctx, &employer, 1..=5, &[]).await;
        let (status, _) = calculate(
            &ctx,
            json!({ "employer_id": employer.id, "year": 2001, "month": 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let uri = format!(
        "/salary?department_id={}&year=2001&month=2&per_page=1&sort_by=nonsense",
        ctx.department.id
    );
    let (status, page) = ctx.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{}", page);
    assert_eq!(page["total"], 2);
    assert_eq!(page["per_page"], 1);
    assert_eq!(page["last_page"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["department_name"], ctx.department.name);

    let uri = format!(
        "/salary?department_id={}&sort_by=final_salary&sort_direction=asc",
        ctx.department.id
    );
    let (_, page) = ctx.send("GET", &uri, None).await;
    let finals: Vec<_> = page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| decimal(&row["final_salary"]))
        .collect();
    assert_eq!(finals.len(), 2);
    assert!(finals[0] <= finals[1]);

    ctx.cleanup().await.unwrap();
}

async fn summary_for(ctx: &TestContext, employer: &Employer, month: u32) -> SalarySummary {
    SalarySummary::find_for_period(&ctx.db, employer.id, PayPeriod::new(2001, month).unwrap())
        .await
        .unwrap()
        .expect("summary should exist")
}

#[tokio::test]
async fn test_moving_attendance_reprices_both_months() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(12000), time(9, 0), time(17, 0))
        .await
        .unwrap();

    let (status, created) = ctx
        .send(
            "POST",
            "/attendances",
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-02-05",
                "attendance_time": "09:00",
                "leave_time": "17:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(summary_for(&ctx, &employer, 2).await.attendance_days, 1);

    let (status, body) = ctx
        .send(
            "PUT",
            &format!("/attendances/{}", created["id"].as_str().unwrap()),
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-03-06",
                "attendance_time": "09:00",
                "leave_time": "17:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let february = summary_for(&ctx, &employer, 2).await;
    let march = summary_for(&ctx, &employer, 3).await;
    assert_eq!(february.attendance_days, 0);
    assert_eq!(february.final_salary, dec!(0));
    assert_eq!(march.attendance_days, 1);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_deleting_attendance_reprices_month() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(12000), time(9, 0), time(17, 0))
        .await
        .unwrap();

    let (status, created) = ctx
        .send(
            "POST",
            "/attendances",
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-03-12",
                "attendance_time": "09:00",
                "leave_time": "17:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(summary_for(&ctx, &employer, 3).await.attendance_days, 1);

    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/attendances/{}", created["id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let march = summary_for(&ctx, &employer, 3).await;
    assert_eq!(march.attendance_days, 0);
    assert_eq!(march.absent_days, 31);
    assert_eq!(march.final_salary, dec!(0));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_deleting_deduction_restores_salary() {
    let ctx = TestContext::new().await.unwrap();
    let employer = ctx
        .create_employer(dec!(12000), time(9, 0), time(17, 0))
        .await
        .unwrap();
    attend_february(&ctx, &employer, 1..=28, &[]).await;

    let (status, created) = ctx
        .send(
            "POST",
            "/adjustments",
            Some(json!({
                "employer_id": employer.id,
                "date": "2001-02-10",
                "value": "100",
                "value_type": "money",
                "kind": "deduction",
                "reason": "Late report"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(summary_for(&ctx, &employer, 2).await.final_salary, dec!(11100));

    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/adjustments/{}", created["id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let february = summary_for(&ctx, &employer, 2).await;
    assert_eq!(february.total_deductions, dec!(0));
    assert_eq!(february.final_salary, dec!(11200));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_salary_listing_survives_huge_page() {
    let ctx = TestContext::new().await.unwrap();

    let uri = format!("/salary?page={}&per_page=100", i64::MAX);
    let (status, page) = ctx.send("GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK, "{}", page);
    assert_eq!(page["page"], i64::MAX);
    assert!(page["data"].as_array().unwrap().is_empty());

    ctx.cleanup().await.unwrap();
}
