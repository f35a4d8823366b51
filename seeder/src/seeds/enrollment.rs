use crate::seed::{SeedFuture, Seeder};
use db::models::{student, subject};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use services::ServiceContext;
use services::grade_service::{GradeService, UpsertGrade};
use services::reservation_service::{BulkCreateReservations, ReservationService};

/// Score on the 1.00 to 5.00 scale, in quarter steps.
fn random_score(rng: &mut StdRng) -> Option<f64> {
    Some((rng.gen_range(1.0..5.0_f64) * 4.0).round() / 4.0)
}

/// Reserves subjects for enrolled students and encodes scores for some of them.
pub struct EnrollmentSeeder;

impl Seeder for EnrollmentSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection, ctx: &'a ServiceContext) -> SeedFuture<'a> {
        Box::pin(async move {
            let mut rng = StdRng::from_entropy();

            let students = student::Entity::find()
                .filter(student::Column::CourseId.is_not_null())
                .all(db)
                .await?;

            for student in students {
                let Some(course_id) = student.course_id else {
                    continue;
                };
                let mut subjects = subject::Entity::find()
                    .filter(subject::Column::CourseId.eq(course_id))
                    .all(db)
                    .await?;
                if subjects.is_empty() {
                    continue;
                }

                subjects.shuffle(&mut rng);
                let take = rng.gen_range(1..=subjects.len());
                let chosen = &subjects[..take];

                ReservationService::bulk_create(
                    db,
                    ctx,
                    BulkCreateReservations {
                        student_id: student.id,
                        subject_ids: chosen.iter().map(|s| s.id).collect(),
                    },
                )
                .await?;

                for subject in chosen {
                    if !rng.gen_bool(0.5) {
                        continue;
                    }
                    let prelim = random_score(&mut rng);
                    let midterm = random_score(&mut rng);
                    let finals = if rng.gen_bool(0.8) { random_score(&mut rng) } else { None };

                    GradeService::upsert(
                        db,
                        ctx,
                        UpsertGrade {
                            student_id: student.id,
                            subject_id: subject.id,
                            course_id,
                            prelim,
                            midterm,
                            finals,
                            remarks: None,
                        },
                    )
                    .await?;
                }
            }

            Ok(())
        })
    }
}
