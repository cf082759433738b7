use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Events {
    Table,
    Id,
    Code,
    Name,
    TotalRounds,
    Status,
    CurrentRound,
    OrganizerEmail,
    CreatedAt,
    UpdatedAt,
    LockVersion,
}

#[derive(Iden)]
enum Participants {
    Table,
    Id,
    EventId,
    Name,
    Company,
    Role,
    Offers,
    Seeks,
    Industries,
    Bio,
    JoinedAt,
}

#[derive(Iden)]
enum Rounds {
    Table,
    Id,
    EventId,
    RoundNo,
    GroupSize,
    DurationMinutes,
    Matcher,
    StartedAt,
    EndedAt,
}

#[derive(Iden)]
enum RoundGroups {
    Table,
    Id,
    EventId,
    RoundId,
    GroupNo,
    Name,
    Rationale,
}

#[derive(Iden)]
enum GroupMembers {
    Table,
    Id,
    GroupId,
    ParticipantId,
}

#[derive(Iden)]
enum Saves {
    Table,
    Id,
    EventId,
    RoundId,
    FromParticipantId,
    ToParticipantId,
    CreatedAt,
}

fn pk(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // events
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk(Events::Id))
                    .col(ColumnDef::new(Events::Code).string_len(16).not_null())
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::TotalRounds).small_integer().not_null())
                    .col(
                        ColumnDef::new(Events::Status)
                            .string_len(16)
                            .not_null()
                            .default("LOBBY"),
                    )
                    .col(
                        ColumnDef::new(Events::CurrentRound)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Events::OrganizerEmail).string().null())
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_events_code")
                    .table(Events::Table)
                    .col(Events::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // participants
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(pk(Participants::Id))
                    .col(ColumnDef::new(Participants::EventId).big_integer().not_null())
                    .col(ColumnDef::new(Participants::Name).string().not_null())
                    .col(
                        ColumnDef::new(Participants::Company)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Participants::Role)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    // Tag lists are JSON arrays stored as text so both backends agree.
                    .col(ColumnDef::new(Participants::Offers).text().not_null())
                    .col(ColumnDef::new(Participants::Seeks).text().not_null())
                    .col(ColumnDef::new(Participants::Industries).text().not_null())
                    .col(ColumnDef::new(Participants::Bio).text().null())
                    .col(
                        ColumnDef::new(Participants::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_event_id")
                            .from(Participants::Table, Participants::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_event_id")
                    .table(Participants::Table)
                    .col(Participants::EventId)
                    .to_owned(),
            )
            .await?;

        // rounds
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(pk(Rounds::Id))
                    .col(ColumnDef::new(Rounds::EventId).big_integer().not_null())
                    .col(ColumnDef::new(Rounds::RoundNo).small_integer().not_null())
                    .col(ColumnDef::new(Rounds::GroupSize).small_integer().not_null())
                    .col(
                        ColumnDef::new(Rounds::DurationMinutes)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rounds::Matcher).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Rounds::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rounds::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rounds_event_id")
                            .from(Rounds::Table, Rounds::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One round per (event, round_no): backstop for concurrent round starts.
        manager
            .create_index(
                Index::create()
                    .name("ux_rounds_event_round_no")
                    .table(Rounds::Table)
                    .col(Rounds::EventId)
                    .col(Rounds::RoundNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // round_groups
        manager
            .create_table(
                Table::create()
                    .table(RoundGroups::Table)
                    .if_not_exists()
                    .col(pk(RoundGroups::Id))
                    .col(ColumnDef::new(RoundGroups::EventId).big_integer().not_null())
                    .col(ColumnDef::new(RoundGroups::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(RoundGroups::GroupNo).small_integer().not_null())
                    .col(ColumnDef::new(RoundGroups::Name).string().not_null())
                    .col(ColumnDef::new(RoundGroups::Rationale).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_groups_event_id")
                            .from(RoundGroups::Table, RoundGroups::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_groups_round_id")
                            .from(RoundGroups::Table, RoundGroups::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_round_groups_round_group_no")
                    .table(RoundGroups::Table)
                    .col(RoundGroups::RoundId)
                    .col(RoundGroups::GroupNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // group_members
        manager
            .create_table(
                Table::create()
                    .table(GroupMembers::Table)
                    .if_not_exists()
                    .col(pk(GroupMembers::Id))
                    .col(ColumnDef::new(GroupMembers::GroupId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GroupMembers::ParticipantId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_members_group_id")
                            .from(GroupMembers::Table, GroupMembers::GroupId)
                            .to(RoundGroups::Table, RoundGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_members_participant_id")
                            .from(GroupMembers::Table, GroupMembers::ParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_group_members_group_participant")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::GroupId)
                    .col(GroupMembers::ParticipantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // saves
        manager
            .create_table(
                Table::create()
                    .table(Saves::Table)
                    .if_not_exists()
                    .col(pk(Saves::Id))
                    .col(ColumnDef::new(Saves::EventId).big_integer().not_null())
                    .col(ColumnDef::new(Saves::RoundId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Saves::FromParticipantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Saves::ToParticipantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Saves::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saves_event_id")
                            .from(Saves::Table, Saves::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saves_round_id")
                            .from(Saves::Table, Saves::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saves_from_participant_id")
                            .from(Saves::Table, Saves::FromParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saves_to_participant_id")
                            .from(Saves::Table, Saves::ToParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A directed edge exists at most once per event, whichever round recorded it.
        manager
            .create_index(
                Index::create()
                    .name("ux_saves_event_from_to")
                    .table(Saves::Table)
                    .col(Saves::EventId)
                    .col(Saves::FromParticipantId)
                    .col(Saves::ToParticipantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Saves::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupMembers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoundGroups::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
