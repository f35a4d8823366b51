use crate::seed::{SeedFuture, Seeder};
use chrono::{Datelike, NaiveDate, Utc};
use db::models::course;
use fake::{
    Fake,
    faker::name::en::{FirstName, LastName},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use services::ServiceContext;
use services::student_service::{CreateStudent, StudentService};

pub struct StudentSeeder;

const STUDENT_COUNT: usize = 30;

impl Seeder for StudentSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection, ctx: &'a ServiceContext) -> SeedFuture<'a> {
        Box::pin(async move {
            let courses = course::Entity::find().all(db).await?;
            let year = Utc::now().year();

            let rows = (0..STUDENT_COUNT)
                .map(|_| {
                    let first_name: String = FirstName().fake();
                    let last_name: String = LastName().fake();
                    let number = format!("{}-{:04}", year, fastrand::u32(1..10_000));
                    let email = format!(
                        "{}.{}{}@example.com",
                        first_name.to_lowercase(),
                        last_name.to_lowercase(),
                        fastrand::u16(..1000)
                    );
                    // A few students start without a course.
                    let course_id = if courses.is_empty() || fastrand::u8(..10) == 0 {
                        None
                    } else {
                        Some(courses[fastrand::usize(..courses.len())].id)
                    };

                    CreateStudent {
                        student_number: number,
                        first_name,
                        middle_name: None,
                        last_name,
                        email: Some(email),
                        birth_date: NaiveDate::from_ymd_opt(
                            year - fastrand::i32(17..25),
                            fastrand::u32(1..=12),
                            fastrand::u32(1..=28),
                        ),
                        course_id,
                    }
                })
                .collect();

            // Random numbers can collide; those rows are reported as failures and skipped.
            StudentService::bulk_create(db, ctx, rows).await?;

            Ok(())
        })
    }
}
