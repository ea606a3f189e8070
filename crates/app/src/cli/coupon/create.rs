use cinemates::coupons::CouponKind;
use cinemates_app::{
    database::{self, Db},
    domain::coupons::{
        CouponsService, PgCouponsService,
        models::{CouponUuid, NewCoupon},
    },
};
use clap::{ArgGroup, Args};
use jiff::civil::Date;

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("discount").required(true).args(["percent_basis_points", "flat_amount"])))]
pub(crate) struct CreateCouponArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Code customers enter, matched case-insensitively
    #[arg(long)]
    code: String,

    /// Category shown in the coupon list
    #[arg(long = "type")]
    coupon_type: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Percentage off in basis points (1000 = 10%)
    #[arg(long)]
    percent_basis_points: Option<u32>,

    /// Fixed amount off in minor units
    #[arg(long)]
    flat_amount: Option<u64>,

    /// First valid day (YYYY-MM-DD)
    #[arg(long)]
    valid_from: Date,

    /// Last valid day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    valid_until: Date,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let kind = match (args.percent_basis_points, args.flat_amount) {
        (Some(basis_points), None) => CouponKind::Percentage { basis_points },
        (None, Some(amount)) => CouponKind::FlatAmount { amount },
        _ => return Err("pass exactly one of --percent-basis-points or --flat-amount".to_string()),
    };

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCouponsService::new(Db::new(pool));

    let coupon = service
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            coupon_type: args.coupon_type,
            description: args.description,
            kind,
            valid_from: args.valid_from,
            valid_until: args.valid_until,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);
    println!("valid: {} to {}", coupon.valid_from, coupon.valid_until);

    Ok(())
}
