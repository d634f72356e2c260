//! Migration: Create class assignments, enrollments and file tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeacherSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherSubjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::TeacherProfileId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeacherSubjects::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(TeacherSubjects::ClassCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teacher_subjects_teacher")
                            .from(TeacherSubjects::Table, TeacherSubjects::TeacherProfileId)
                            .to(TeacherProfiles::Table, TeacherProfiles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teacher_subjects_subject")
                            .from(TeacherSubjects::Table, TeacherSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One assignment per (teacher, subject)
        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_subjects_pair")
                    .table(TeacherSubjects::Table)
                    .col(TeacherSubjects::TeacherProfileId)
                    .col(TeacherSubjects::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enrollments::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Enrollments::StudentProfileId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from(Enrollments::Table, Enrollments::StudentProfileId)
                            .to(StudentProfiles::Table, StudentProfiles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_subject")
                            .from(Enrollments::Table, Enrollments::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one enrollment per (student, subject)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_pair")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentProfileId)
                    .col(Enrollments::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FileUploads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FileUploads::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(FileUploads::StorageKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FileUploads::FileName).string().not_null())
                    .col(ColumnDef::new(FileUploads::SizeBytes).big_integer().not_null())
                    .col(ColumnDef::new(FileUploads::MimeType).string().not_null())
                    .col(ColumnDef::new(FileUploads::UploadedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(FileUploads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_uploads_user")
                            .from(FileUploads::Table, FileUploads::UploadedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubjectFiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SubjectFiles::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(SubjectFiles::FileUploadId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SubjectFiles::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(SubjectFiles::Title).string().not_null())
                    .col(ColumnDef::new(SubjectFiles::Description).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_files_upload")
                            .from(SubjectFiles::Table, SubjectFiles::FileUploadId)
                            .to(FileUploads::Table, FileUploads::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_files_subject")
                            .from(SubjectFiles::Table, SubjectFiles::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubjectFiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FileUploads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherSubjects::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TeacherSubjects {
    Table,
    Id,
    TeacherProfileId,
    SubjectId,
    ClassCode,
    CreatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    StudentProfileId,
    SubjectId,
    EnrolledAt,
}

#[derive(Iden)]
enum FileUploads {
    Table,
    Id,
    StorageKey,
    FileName,
    SizeBytes,
    MimeType,
    UploadedBy,
    CreatedAt,
}

#[derive(Iden)]
enum SubjectFiles {
    Table,
    Id,
    FileUploadId,
    SubjectId,
    Title,
    Description,
}

#[derive(Iden)]
enum TeacherProfiles {
    Table,
    Id,
}

#[derive(Iden)]
enum StudentProfiles {
    Table,
    Id,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
