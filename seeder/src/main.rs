use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    course::CourseSeeder, enrollment::EnrollmentSeeder, student::StudentSeeder, user::UserSeeder,
};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use services::ServiceContext;
use util::config;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = db::connect().await.expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let ctx = ServiceContext::system(config::system_actor_id());

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(CourseSeeder), "Course"),
        (Box::new(StudentSeeder), "Student"),
        (Box::new(EnrollmentSeeder), "Enrollment"),
    ] {
        run_seeder(&*seeder, name, &db, &ctx).await;
    }
}
