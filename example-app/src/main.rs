//! # 示例应用程序
//!
//! 演示构造函数注入与方法拦截：结账服务依赖支付网关接口，
//! 网关的实现被代理，调用前后经过计时与审计拦截器

use clap::Parser;
use component_macros::{component_methods, Injectable};
use di_abstractions::{InterceptionContext, Interceptor, MethodMatcher};
use di_impl::{Container, ContainerSettings, TypeCatalog};
use infrastructure_common::{arguments, Instance, MethodDescriptor, TypeDescriptor, Value};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

const PAYMENT_GATEWAY: &str = "billing::PaymentGateway";
const CHECKOUT_SERVICE: &str = "billing::CheckoutService";

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "依赖注入与方法拦截示例")]
struct Args {
    /// 配置文件路径，文件不存在时使用默认配置
    #[arg(short, long, default_value = "config/app.toml")]
    config: PathBuf,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 付款账户
    #[arg(long, default_value = "alice")]
    account: String,

    /// 金额（分）
    #[arg(long, default_value_t = 1250)]
    amount: u64,

    /// 输出容器的类型映射与依赖图
    #[arg(long)]
    dump_state: bool,
}

#[derive(Debug, thiserror::Error)]
enum BillingError {
    #[error("账户 {account} 的付款被拒绝: 金额 {cents} 超过单笔限额 {limit}")]
    Declined { account: String, cents: u64, limit: u64 },

    #[error("支付网关调用失败: {0}")]
    Gateway(String),
}

/// 沙箱支付网关
#[derive(Injectable)]
#[injectable(name = "billing::SandboxGateway", implements = "billing::PaymentGateway")]
struct SandboxGateway {
    charges: Mutex<u64>,
}

#[component_methods]
impl SandboxGateway {
    const LIMIT: u64 = 100_000;

    pub fn charge(&self, account: &str, cents: u64) -> Result<String, BillingError> {
        if cents > Self::LIMIT {
            return Err(BillingError::Declined {
                account: account.to_string(),
                cents,
                limit: Self::LIMIT,
            });
        }
        let mut charges = self.charges.lock();
        *charges += 1;
        Ok(format!("sandbox-{}-{}", account, *charges))
    }

    #[sealed]
    pub fn provider(&self) -> String {
        "sandbox".to_string()
    }
}

/// 记账本
#[derive(Injectable)]
#[injectable(name = "billing::Ledger")]
struct Ledger {
    entries: Mutex<Vec<String>>,
}

#[component_methods]
impl Ledger {
    pub fn record(&self, entry: String) -> usize {
        let mut entries = self.entries.lock();
        entries.push(entry);
        entries.len()
    }
}

/// 结账服务
#[derive(Injectable)]
#[injectable(name = "billing::CheckoutService")]
struct CheckoutService {
    #[inject("billing::PaymentGateway")]
    gateway: Instance,
    #[inject]
    ledger: Arc<Ledger>,
}

#[component_methods]
impl CheckoutService {
    pub fn checkout(&self, account: &str, cents: u64) -> Result<String, BillingError> {
        let receipt = self
            .gateway
            .call("charge", arguments![account.to_string(), cents])
            .map_err(|e| BillingError::Gateway(e.to_string()))?
            .and_then(|value| value.get::<String>())
            .ok_or_else(|| BillingError::Gateway("网关没有返回收据".to_string()))?;
        let position = self.ledger.record(format!("{} {} {}", account, cents, receipt));
        info!("记账第 {} 条: {}", position, receipt);
        Ok(receipt)
    }
}

/// 记录方法耗时
struct TimingInterceptor;

impl Interceptor for TimingInterceptor {
    fn on_before_method_call(&self, context: &mut InterceptionContext) {
        context.set_datum("started", Value::new(Instant::now()));
    }

    fn on_after_method_call(&self, context: &mut InterceptionContext) {
        if let Some(started) = context.data("started").and_then(|v| v.get::<Instant>()) {
            info!("{} 耗时 {:?}", context.method().cache_key(), started.elapsed());
        }
    }
}

/// 记录失败的调用
struct AuditInterceptor;

impl Interceptor for AuditInterceptor {
    fn on_before_method_call(&self, context: &mut InterceptionContext) {
        info!(
            "调用 {} ({} 个参数)",
            context.method().cache_key(),
            context.arguments().len()
        );
    }

    fn on_after_method_call(&self, context: &mut InterceptionContext) {
        if let Some(failure) = context.failure() {
            warn!("{} 失败: {}", context.method().cache_key(), failure);
        }
    }
}

fn build_catalog() -> Arc<TypeCatalog> {
    let catalog = Arc::new(TypeCatalog::new());
    catalog
        .register(TypeDescriptor::interface(PAYMENT_GATEWAY))
        .register_type::<SandboxGateway>()
        .register_type::<Ledger>()
        .register_type::<CheckoutService>();
    catalog
}

type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn build_container(settings: ContainerSettings) -> AppResult<Container> {
    let mut container = Container::builder()
        .with_catalog(build_catalog())
        .with_settings(settings)
        .build();

    let charges_only: MethodMatcher = Arc::new(|method: &MethodDescriptor| method.name == "charge");
    let everything: MethodMatcher = Arc::new(|_: &MethodDescriptor| true);

    container
        .register_type(PAYMENT_GATEWAY, "billing::SandboxGateway")?
        .proxy_type(PAYMENT_GATEWAY)
        .register_interceptor(Arc::new(TimingInterceptor), charges_only)
        .register_interceptor(Arc::new(AuditInterceptor), everything);
    Ok(container)
}

fn main() -> AppResult<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .init();

    info!("启动示例应用, 配置文件: {}", args.config.display());
    let settings = ContainerSettings::load(&args.config)?;
    let container = build_container(settings)?;

    let checkout = container.resolve(CHECKOUT_SERVICE)?;
    match checkout.call("checkout", arguments![args.account.clone(), args.amount]) {
        Ok(receipt) => {
            let receipt = receipt.and_then(|v| v.get::<String>()).unwrap_or_default();
            info!("付款成功, 收据: {}", receipt);
        }
        Err(e) => warn!("付款失败: {}", e),
    }

    if args.dump_state {
        println!("{}", container.serialize()?);
    }

    Ok(())
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
